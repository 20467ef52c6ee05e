//! 共享库
//!
//! 包含问卷工具各入口程序共用的配置加载与可观测性初始化代码。

pub mod config;
pub mod observability;
