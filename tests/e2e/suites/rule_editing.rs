//! 规则编辑测试套件
//!
//! 模拟编辑器会话：加载已保存的问题、修改规则、保存后重新加载。

use crate::data::*;
use logic_engine::{
    Change, ConditionTree, LogicalOperator, OperatorTarget, PresetKey, PresetLibrary, Question,
    QuestionEditor, ResponseAnswer, RuleMode, SaveSink, ScaleFamily, TablePattern,
    preset::detect_family,
};
use pretty_assertions::assert_eq;

/// 合并连续脏通知的保存回调（模拟防抖）
#[derive(Default)]
struct DebouncedSink {
    pending: Vec<String>,
    notifications: usize,
}

impl SaveSink for DebouncedSink {
    fn mark_dirty(&mut self, question_id: &str) {
        self.notifications += 1;
        if !self.pending.iter().any(|id| id == question_id) {
            self.pending.push(question_id.to_string());
        }
    }
}

/// 保存后重新加载（序列化往返）
fn save_and_reload(question: &Question) -> Question {
    let stored = serde_json::to_string(question).unwrap();
    serde_json::from_str(&stored).unwrap()
}

#[cfg(test)]
mod editor_session_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rapid_edits_only_final_state_matters() {
        let mut question = TestQuestionnaire::question("S1");
        let mut sink = DebouncedSink::default();

        {
            let mut editor = QuestionEditor::new(&mut question, &mut sink);
            for _ in 0..10 {
                let _ = editor.toggle_option("4").unwrap();
            }
            let _ = editor.toggle_option("4").unwrap();
            let _ = editor
                .set_operator(OperatorTarget::Tree, LogicalOperator::Or)
                .unwrap();
        }

        assert_eq!(sink.notifications, 11);
        assert_eq!(sink.pending, vec!["S1"]);

        let reloaded = save_and_reload(&question);
        let tree = reloaded.termination.as_ref().unwrap();
        assert_eq!(tree.conditions[0].operands, vec!["1", "4"]);

        let senior = ResponseAnswer::Select(["4"].into_iter().collect());
        assert!(reloaded.should_terminate(Some(&senior)));
    }

    #[test]
    fn test_switch_to_advanced_and_back() {
        let mut question = TestQuestionnaire::question("S1");
        let mut sink = DebouncedSink::default();

        let mut editor = QuestionEditor::new(&mut question, &mut sink);
        assert_eq!(editor.set_mode(RuleMode::Advanced).unwrap(), Change::Dirty);
        let _ = editor.add_condition().unwrap();
        let _ = editor.toggle_operand(1, "2").unwrap();
        let _ = editor.set_condition_type(1).unwrap();
        let _ = editor
            .set_operator(OperatorTarget::Tree, LogicalOperator::And)
            .unwrap();
        let _ = editor.set_mode(RuleMode::Simple).unwrap();

        // 回到简单模式时排除条件被丢弃，只保留包含选项
        let tree = editor.question().termination.clone().unwrap();
        assert_eq!(tree, ConditionTree::simple(LogicalOperator::And, ["1"]));
    }

    #[test]
    fn test_disable_survives_reload() {
        let mut question = TestQuestionnaire::question("S1");
        let mut sink = DebouncedSink::default();
        let _ = QuestionEditor::new(&mut question, &mut sink).disable();

        let reloaded = save_and_reload(&question);
        let tree = reloaded.termination.as_ref().unwrap();
        assert!(!tree.enabled);
        assert_eq!(tree.conditions.len(), 1);
    }
}

#[cfg(test)]
mod grid_editing_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rescale_grid_and_reapply_pattern() {
        let mut question = TestQuestionnaire::question("Q1");
        let cols = question.grid.as_ref().unwrap().cols.clone();
        assert_eq!(detect_family(&cols), Some(ScaleFamily::Agreement));

        // 5 点改为 7 点后重新应用预设，前两档随之移动
        let library = PresetLibrary::new();
        library
            .apply(&PresetKey::Builtin(ScaleFamily::Agreement), 7, &mut question)
            .unwrap();

        let mut sink = DebouncedSink::default();
        {
            let mut editor = QuestionEditor::new(&mut question, &mut sink);
            let _ = editor.apply_table_pattern(TablePattern::MustT2bAny).unwrap();
        }

        let rule = question.termination.as_ref().unwrap().table.as_ref().unwrap();
        assert_eq!(rule.column_codes, vec!["6", "7"]);
        assert_eq!(rule.describe(), TablePattern::MustT2bAny.describe());

        let five = ResponseAnswer::Grid([(0, "5"), (1, "5"), (2, "5")].into_iter().collect());
        assert!(question.should_terminate(Some(&five)));
    }

    #[test]
    fn test_satisfaction_scale_hides_neutral_preset() {
        let mut question = TestQuestionnaire::question("Q1");
        PresetLibrary::new()
            .apply(&PresetKey::Builtin(ScaleFamily::Satisfaction), 5, &mut question)
            .unwrap();

        let available = TablePattern::available_for(&question.grid.as_ref().unwrap().cols);
        assert!(!available.contains(&TablePattern::CannotNeutralAll));
        assert!(available.contains(&TablePattern::Custom));
    }
}
