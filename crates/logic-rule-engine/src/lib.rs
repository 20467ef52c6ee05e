//! 问卷逻辑规则引擎
//!
//! 提供问卷终止条件与交叉表横幅列共用的规则能力，支持：
//! - 条件树的构建与变更（简单模式 / 高级模式）
//! - 受访者作答的纯函数式评估
//! - 表格题的 行量词 × 列编码 规则及预设
//! - 条件树与方程字符串的双向转换
//! - 量表标签预设库
//! - 批量终止模拟

pub mod banner;
pub mod builder;
pub mod compiler;
pub mod editor;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod operators;
pub mod parser;
pub mod preset;
pub mod simulation;
pub mod table;


pub use banner::BannerColumn;
pub use builder::{Change, OperatorTarget};
pub use compiler::{EquationCompiler, compile, decompile};
pub use editor::{QuestionEditor, SaveSink};
pub use error::{Result, RuleError};
pub use evaluator::{EvaluationResult, RuleEvaluator, evaluate, evaluate_with_catalog};
pub use models::{
    AnswerOption, AnswerSet, Condition, ConditionTree, Grid, GridAnswers, Question, QuestionKind,
    Respondent, ResponseAnswer,
};
pub use operators::{ConditionType, LogicalOperator, RuleMode};
pub use preset::{PresetKey, PresetLibrary, ScaleFamily};
pub use simulation::{SimulationReport, TerminationSimulator};
pub use table::{Requirement, RowFilter, TablePattern, TableRule, evaluate_table};
