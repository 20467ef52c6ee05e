//! 规则引擎错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("方程解析失败: 位置 {position}: {message}")]
    EquationParse { position: usize, message: String },

    #[error("方程结构无法还原为条件树: {0}")]
    UnsupportedEquation(String),

    #[error("选项编码无法写入方程: '{0}'")]
    InvalidOperandCode(String),

    #[error("该操作仅在高级模式下可用: {0}")]
    AdvancedModeRequired(&'static str),

    #[error("条件索引越界: {index} (共 {len} 个条件)")]
    ConditionIndexOutOfRange { index: usize, len: usize },

    #[error("问题尚未配置终止规则: {0}")]
    RuleNotConfigured(String),

    #[error("预设未找到: {0}")]
    PresetNotFound(String),

    #[error("不支持的量表点数: {0}")]
    UnsupportedPointCount(usize),

    #[error("预设标签数量不匹配: 期望 {expected}, 实际 {actual}")]
    LabelCountMismatch { expected: usize, actual: usize },

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RuleError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::EquationParse { .. } => "EQUATION_PARSE_FAILED",
            Self::UnsupportedEquation(_) => "UNSUPPORTED_EQUATION",
            Self::InvalidOperandCode(_) => "INVALID_OPERAND_CODE",
            Self::AdvancedModeRequired(_) => "ADVANCED_MODE_REQUIRED",
            Self::ConditionIndexOutOfRange { .. } => "CONDITION_INDEX_OUT_OF_RANGE",
            Self::RuleNotConfigured(_) => "RULE_NOT_CONFIGURED",
            Self::PresetNotFound(_) => "PRESET_NOT_FOUND",
            Self::UnsupportedPointCount(_) => "UNSUPPORTED_POINT_COUNT",
            Self::LabelCountMismatch { .. } => "LABEL_COUNT_MISMATCH",
            Self::JsonError(_) => "JSON_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
