//! 量表预设数据模型

use crate::error::{Result, RuleError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 支持的量表点数
pub const SUPPORTED_POINTS: [usize; 4] = [3, 5, 7, 10];

/// 校验量表点数
pub fn ensure_supported(points: usize) -> Result<()> {
    if SUPPORTED_POINTS.contains(&points) {
        Ok(())
    } else {
        Err(RuleError::UnsupportedPointCount(points))
    }
}

/// 内置量表语义族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleFamily {
    Agreement,
    Applicability,
    Consideration,
    Likelihood,
    Satisfaction,
}

impl ScaleFamily {
    pub const ALL: [ScaleFamily; 5] = [
        Self::Agreement,
        Self::Applicability,
        Self::Consideration,
        Self::Likelihood,
        Self::Satisfaction,
    ];

    /// 展示名称
    pub fn label(self) -> &'static str {
        match self {
            Self::Agreement => "Agreement",
            Self::Applicability => "Applicability",
            Self::Consideration => "Consideration",
            Self::Likelihood => "Likelihood",
            Self::Satisfaction => "Satisfaction",
        }
    }
}

impl fmt::Display for ScaleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().to_ascii_lowercase())
    }
}

/// 预设键
///
/// 内置与自定义预设处于不同命名空间，同名不会互相遮蔽。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum PresetKey {
    Builtin(ScaleFamily),
    Custom(String),
}

impl PresetKey {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }
}

impl From<ScaleFamily> for PresetKey {
    fn from(family: ScaleFamily) -> Self {
        Self::Builtin(family)
    }
}

impl fmt::Display for PresetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(family) => write!(f, "builtin:{}", family),
            Self::Custom(name) => write!(f, "custom:{}", name),
        }
    }
}

/// 预设列表项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetSummary {
    pub key: PresetKey,
    pub label: String,
    pub labels: Vec<String>,
}
