//! 测试数据 Fixtures
//!
//! 预定义的问卷文档，字段名与问卷存储记录一致。

use logic_engine::{Question, Respondent};
use serde_json::{Value, json};

/// 测试问卷
pub struct TestQuestionnaire;

impl TestQuestionnaire {
    /// 存储记录格式的问卷文档
    pub fn document() -> Value {
        json!({
            "questions": [
                {
                    "id": "S1",
                    "text": "What is your age?",
                    "type": "single",
                    "options": [
                        {"code": "1", "label": "Under 18"},
                        {"code": "2", "label": "18-34"},
                        {"code": "3", "label": "35-54"},
                        {"code": "4", "label": "55+"}
                    ],
                    "globalTermination": {
                        "enabled": true,
                        "mode": "simple",
                        "operator": "OR",
                        "conditions": [{"type": "include", "options": ["1"], "operator": "OR"}]
                    }
                },
                {
                    "id": "S2",
                    "text": "Which of these brands have you bought?",
                    "type": "multi",
                    "options": [
                        {"code": "1", "label": "Brand A"},
                        {"code": "2", "label": "Brand B"},
                        {"code": "3", "label": "Brand C"},
                        {"code": "4", "label": "None of these"}
                    ],
                    "globalTermination": {
                        "enabled": true,
                        "mode": "advanced",
                        "operator": "OR",
                        "conditions": [
                            {"type": "include", "options": ["4"], "operator": "OR"},
                            {"type": "exclude", "options": ["1", "2", "3"], "operator": "OR"}
                        ]
                    }
                },
                {
                    "id": "Q1",
                    "text": "How much do you agree with each statement?",
                    "type": "likert_grid",
                    "grid": {
                        "rows": ["Good value", "High quality", "Trustworthy"],
                        "cols": ["Strongly disagree", "Disagree", "Neither", "Agree", "Strongly agree"]
                    },
                    "globalTermination": {
                        "enabled": true,
                        "mode": "simple",
                        "operator": "OR",
                        "conditions": [],
                        "rowFilter": "any",
                        "specificRows": [],
                        "columnCodes": ["4", "5"],
                        "tablePattern": "must_t2b_any"
                    }
                },
                {
                    "id": "Q2",
                    "text": "Any other comments?",
                    "type": "single",
                    "options": [{"code": "1", "label": "Yes"}, {"code": "2", "label": "No"}],
                    "globalTermination": {
                        "enabled": false,
                        "conditions": [{"type": "include", "options": ["2"], "operator": "OR"}]
                    }
                }
            ],
            "respondents": [
                {"id": "minor", "answers": {"S1": ["1"]}},
                {"id": "non-buyer", "answers": {"S1": ["2"], "S2": ["4"]}},
                {"id": "detractor", "answers": {
                    "S1": ["3"], "S2": ["1"],
                    "Q1": {"0": "1", "1": "2", "2": "3"}
                }},
                {"id": "unanswered-grid", "answers": {"S1": ["3"], "S2": ["2"]}},
                {"id": "qualified", "answers": {
                    "S1": ["2"], "S2": ["1", "3"],
                    "Q1": {"0": "2", "1": "5", "2": "3"},
                    "Q2": ["2"]
                }}
            ]
        })
    }

    pub fn questions() -> Vec<Question> {
        serde_json::from_value(Self::document()["questions"].clone())
            .expect("fixture questions must deserialize")
    }

    pub fn respondents() -> Vec<Respondent> {
        serde_json::from_value(Self::document()["respondents"].clone())
            .expect("fixture respondents must deserialize")
    }

    pub fn question(id: &str) -> Question {
        Self::questions()
            .into_iter()
            .find(|q| q.id == id)
            .unwrap_or_else(|| panic!("fixture question {} missing", id))
    }
}
