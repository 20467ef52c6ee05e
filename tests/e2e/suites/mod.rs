//! 测试套件模块
//!
//! 按业务功能组织的测试用例集合。

pub mod banner_export;
pub mod rule_editing;
pub mod termination_flow;
