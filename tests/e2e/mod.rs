//! 问卷规则端到端测试
//!
//! 测试覆盖完整的业务流程，包括：
//! - 从存储记录加载问卷与终止规则
//! - 编辑器会话与保存通知
//! - 表格题预设与量表预设
//! - 横幅列方程导出与重新打开
//! - 批量终止模拟

pub mod data;
pub mod suites;
