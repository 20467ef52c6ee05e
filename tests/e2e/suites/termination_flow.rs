//! 终止流程测试套件
//!
//! 从问卷文档出发执行批量终止模拟，验证每位受访者的终止位置。

use crate::data::*;
use logic_engine::{ResponseAnswer, TerminationSimulator};
use pretty_assertions::assert_eq;

#[cfg(test)]
mod simulation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_simulation_report() {
        let questions = TestQuestionnaire::questions();
        let respondents = TestQuestionnaire::respondents();

        let report = TerminationSimulator::new(&questions).run(&respondents);

        assert_eq!(report.total, 5);
        assert_eq!(report.completes, 1);
        assert_eq!(
            report.terminated,
            vec![
                ("minor".to_string(), "S1".to_string()),
                ("non-buyer".to_string(), "S2".to_string()),
                ("detractor".to_string(), "Q1".to_string()),
                ("unanswered-grid".to_string(), "Q1".to_string()),
            ]
        );
        assert_eq!(report.terminations_by_question.get("Q1"), Some(&2));
        assert_eq!(report.terminations_by_question.get("Q2"), None);
    }

    #[test]
    fn test_report_serializes_for_export() {
        let report = TerminationSimulator::new(&TestQuestionnaire::questions())
            .run(&TestQuestionnaire::respondents());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["total"], 5);
        assert_eq!(json["terminations_by_question"]["S1"], 1);
        assert_eq!(json["terminated"][0][0], "minor");
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let questions = TestQuestionnaire::questions();
        let respondents: Vec<_> = TestQuestionnaire::respondents()
            .into_iter()
            .cycle()
            .take(1_000)
            .collect();

        let sequential = TerminationSimulator::new(&questions)
            .with_parallel_threshold(usize::MAX)
            .run(&respondents);
        let parallel = TerminationSimulator::new(&questions)
            .with_parallel_threshold(1)
            .run(&respondents);

        assert_eq!(sequential, parallel);
        assert_eq!(parallel.completes, 200);
    }
}

#[cfg(test)]
mod question_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_disabled_rule_never_terminates() {
        let question = TestQuestionnaire::question("Q2");
        let answer = ResponseAnswer::Select(["2"].into_iter().collect());
        assert!(!question.should_terminate(Some(&answer)));
    }

    #[test]
    fn test_exclude_condition_catches_non_buyers() {
        let question = TestQuestionnaire::question("S2");

        let none = ResponseAnswer::Select(["4"].into_iter().collect());
        let brand = ResponseAnswer::Select(["2"].into_iter().collect());
        assert!(question.should_terminate(Some(&none)));
        assert!(!question.should_terminate(Some(&brand)));
        // 未作答：没有选中任何品牌，排除条件成立
        assert!(question.should_terminate(None));
    }

    #[test]
    fn test_table_rule_quantifier_and_sense() {
        let question = TestQuestionnaire::question("Q1");
        let one_top = ResponseAnswer::Grid([(0, "1"), (1, "5")].into_iter().collect());

        assert_eq!(question.evaluate_table(Some(&one_top)), Some(true));
        assert!(!question.should_terminate(Some(&one_top)));
        assert_eq!(question.evaluate_table(None), Some(false));
    }
}
