//! 规则操作符定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 逻辑操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    #[default]
    Or,
}

impl LogicalOperator {
    /// 对一组布尔值应用该操作符；空输入由调用方处理
    pub fn combine<I>(self, values: I) -> bool
    where
        I: IntoIterator<Item = bool>,
    {
        let mut values = values.into_iter();
        match self {
            Self::And => values.all(|v| v),
            Self::Or => values.any(|v| v),
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

/// 条件类型：包含（IS）或排除（NOT）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    #[default]
    Include,
    Exclude,
}

impl ConditionType {
    pub fn flipped(self) -> Self {
        match self {
            Self::Include => Self::Exclude,
            Self::Exclude => Self::Include,
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include => write!(f, "include"),
            Self::Exclude => write!(f, "exclude"),
        }
    }
}

/// 规则编辑模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleMode {
    /// 选项勾选模式：所有选中项合并为一个包含条件
    #[default]
    Simple,
    /// 高级模式：多个条件，支持 AND/OR/NOT 组合
    Advanced,
}

impl fmt::Display for RuleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine() {
        assert!(LogicalOperator::And.combine([true, true]));
        assert!(!LogicalOperator::And.combine([true, false]));
        assert!(LogicalOperator::Or.combine([false, true]));
        assert!(!LogicalOperator::Or.combine([false, false]));
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&LogicalOperator::And).unwrap(), "\"AND\"");
        assert_eq!(serde_json::to_string(&ConditionType::Exclude).unwrap(), "\"exclude\"");
        let mode: RuleMode = serde_json::from_str("\"advanced\"").unwrap();
        assert_eq!(mode, RuleMode::Advanced);
    }
}
