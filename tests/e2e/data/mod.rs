//! 测试数据模块
//!
//! 提供问卷与受访者 fixtures。

mod fixtures;

pub use fixtures::*;
