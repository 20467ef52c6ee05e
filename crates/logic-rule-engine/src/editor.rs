//! 问题规则编辑器
//!
//! 把 [`builder`](crate::builder) 的纯状态转换与宿主提供的保存回调连接起来：
//! 每次产生 `Dirty` 的变更都会通知 [`SaveSink`]，防抖与持久化由宿主负责。

use crate::builder::{self, Change, OperatorTarget};
use crate::error::Result;
use crate::models::Question;
use crate::operators::{LogicalOperator, RuleMode};
use crate::table::{RowFilter, TablePattern};

/// 保存回调接口
///
/// 宿主实现此接口以接收“规则已修改”的通知，通常在防抖窗口结束后统一保存。
#[cfg_attr(test, mockall::automock)]
pub trait SaveSink {
    fn mark_dirty(&mut self, question_id: &str);
}

/// 问题规则编辑器
pub struct QuestionEditor<'a, S: SaveSink> {
    question: &'a mut Question,
    sink: &'a mut S,
}

impl<'a, S: SaveSink> QuestionEditor<'a, S> {
    pub fn new(question: &'a mut Question, sink: &'a mut S) -> Self {
        Self { question, sink }
    }

    pub fn question(&self) -> &Question {
        self.question
    }

    pub fn enable(&mut self) -> Change {
        let change = builder::enable(self.question);
        self.notify(change)
    }

    pub fn disable(&mut self) -> Change {
        let change = builder::disable(self.question);
        self.notify(change)
    }

    pub fn set_mode(&mut self, mode: RuleMode) -> Result<Change> {
        let change = builder::set_mode(builder::termination_mut(self.question)?, mode);
        Ok(self.notify(change))
    }

    pub fn toggle_option(&mut self, code: &str) -> Result<Change> {
        let change = builder::toggle_option(builder::termination_mut(self.question)?, code);
        Ok(self.notify(change))
    }

    pub fn toggle_operand(&mut self, index: usize, code: &str) -> Result<Change> {
        let change = builder::toggle_operand(builder::termination_mut(self.question)?, index, code)?;
        Ok(self.notify(change))
    }

    pub fn add_condition(&mut self) -> Result<Change> {
        let change = builder::add_condition(builder::termination_mut(self.question)?)?;
        Ok(self.notify(change))
    }

    pub fn remove_condition(&mut self, index: usize) -> Result<Change> {
        let change = builder::remove_condition(builder::termination_mut(self.question)?, index)?;
        Ok(self.notify(change))
    }

    pub fn set_condition_type(&mut self, index: usize) -> Result<Change> {
        let change = builder::set_condition_type(builder::termination_mut(self.question)?, index)?;
        Ok(self.notify(change))
    }

    pub fn set_operator(&mut self, target: OperatorTarget, value: LogicalOperator) -> Result<Change> {
        let change = builder::set_operator(builder::termination_mut(self.question)?, target, value)?;
        Ok(self.notify(change))
    }

    pub fn apply_table_pattern(&mut self, pattern: TablePattern) -> Result<Change> {
        let change = builder::apply_table_pattern(self.question, pattern)?;
        Ok(self.notify(change))
    }

    pub fn set_table_row_filter(&mut self, row_filter: RowFilter) -> Result<Change> {
        let change = builder::set_table_row_filter(self.question, row_filter)?;
        Ok(self.notify(change))
    }

    pub fn toggle_table_column(&mut self, code: &str) -> Result<Change> {
        let change = builder::toggle_table_column(self.question, code)?;
        Ok(self.notify(change))
    }

    pub fn toggle_table_row(&mut self, row: usize) -> Result<Change> {
        let change = builder::toggle_table_row(self.question, row)?;
        Ok(self.notify(change))
    }

    fn notify(&mut self, change: Change) -> Change {
        if change.is_dirty() {
            self.sink.mark_dirty(&self.question.id);
        }
        change
    }
}
