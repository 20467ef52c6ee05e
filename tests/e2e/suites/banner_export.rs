//! 横幅列导出测试套件
//!
//! 把问题的规则导出为交叉表横幅列，并验证方程可以重新打开。

use crate::data::*;
use logic_engine::{
    AnswerSet, BannerColumn, ConditionTree, EquationCompiler, RuleError, evaluate,
};
use pretty_assertions::assert_eq;

fn export(question_id: &str) -> BannerColumn {
    let question = TestQuestionnaire::question(question_id);
    let tree = question.termination.as_ref().unwrap();
    BannerColumn::from_tree(format!("{} segment", question_id), tree).unwrap()
}

#[cfg(test)]
mod export_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_questionnaire_rules() {
        assert_eq!(export("S1").equation, "1");
        assert_eq!(export("S2").equation, "4 OR NOT (1 OR 2 OR 3)");
    }

    #[test]
    fn test_reopened_banner_is_equivalent() {
        let original = TestQuestionnaire::question("S2").termination.unwrap();
        let column = export("S2");
        let reopened = column.tree().unwrap();

        let samples: [&[&str]; 5] = [&[], &["1"], &["4"], &["2", "4"], &["1", "2", "3"]];
        for codes in samples {
            let answers: AnswerSet = codes.iter().copied().collect();
            assert_eq!(
                evaluate(&original, &answers),
                evaluate(&reopened, &answers),
                "answers {:?}",
                codes
            );
        }
    }

    #[test]
    fn test_columns_get_distinct_ids() {
        let a = export("S1");
        let b = export("S1");
        assert_ne!(a.id, b.id);
        assert_eq!(a.equation, b.equation);
    }
}

#[cfg(test)]
mod hand_edited_equation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hand_edited_equation_is_tolerated() {
        let column = BannerColumn {
            id: "col-1".to_string(),
            name: "Edited".to_string(),
            equation: "(1 or 2) and not 4".to_string(),
        };
        let tree = column.tree().unwrap();
        assert_eq!(
            EquationCompiler::new().compile(&tree).unwrap(),
            "(1 OR 2) AND NOT 4"
        );
    }

    #[test]
    fn test_malformed_equation_is_distinct_failure() {
        let column = BannerColumn {
            id: "col-2".to_string(),
            name: "Broken".to_string(),
            equation: "1 AND (2 OR".to_string(),
        };
        assert!(matches!(column.tree(), Err(RuleError::EquationParse { .. })));

        let empty = BannerColumn {
            equation: String::new(),
            ..column
        };
        assert_eq!(empty.tree().unwrap(), ConditionTree::new());
    }
}
