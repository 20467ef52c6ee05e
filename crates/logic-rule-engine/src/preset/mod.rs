//! 量表预设模块
//!
//! 李克特/表格题的列标签预设，按量表点数与语义族组织。
//!
//! # 主要功能
//!
//! - `ScaleFamily`: 内置语义族（同意度、适用度、考虑度、可能性、满意度）
//! - `PresetKey`: 内置预设与自定义预设的统一键，两者命名空间互不覆盖
//! - `PresetLibrary`: 预设查询、应用与自定义预设管理
//!
//! 应用预设直接设置问题的列标签，与终止规则的表格预设是两条不同的变更路径。

pub mod catalog;
pub mod library;
pub mod models;

pub use catalog::{builtin_labels, detect_family};
pub use library::PresetLibrary;
pub use models::*;
