//! 条件树构建与变更
//!
//! 规则编辑器的全部状态转换。每个操作只修改传入的规则，
//! 不做任何 I/O，返回 [`Change`] 作为显式的“脏”信号，由宿主负责调度持久化。
//! 同一规则可以在防抖窗口内被连续调用任意多次，只有最终状态需要保存。

use crate::error::{Result, RuleError};
use crate::models::{Condition, ConditionTree, Question};
use crate::operators::{ConditionType, LogicalOperator, RuleMode};
use crate::table::{RowFilter, TablePattern, TableRule};
use tracing::debug;

/// 变更结果
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// 规则已修改，需要持久化
    Dirty,
    /// 规则未变化
    Unchanged,
}

impl Change {
    pub fn from_changed(changed: bool) -> Self {
        if changed { Self::Dirty } else { Self::Unchanged }
    }

    pub fn is_dirty(self) -> bool {
        self == Self::Dirty
    }

    /// 合并多次变更：任一为 Dirty 则结果为 Dirty
    pub fn merge(self, other: Change) -> Change {
        Self::from_changed(self.is_dirty() || other.is_dirty())
    }
}

/// 操作符设置目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorTarget {
    /// 条件之间的组合方式
    Tree,
    /// 指定条件内部选项的组合方式
    Condition(usize),
}

/// 启用终止规则：不存在时创建默认规则，否则仅设置启用标记
pub fn enable(question: &mut Question) -> Change {
    match question.termination.as_mut() {
        Some(tree) if tree.enabled => Change::Unchanged,
        Some(tree) => {
            tree.enabled = true;
            debug!(question_id = %question.id, "termination rule re-enabled");
            Change::Dirty
        }
        None => {
            question.termination = Some(ConditionTree::new());
            debug!(question_id = %question.id, "termination rule created");
            Change::Dirty
        }
    }
}

/// 禁用终止规则，保留已有配置以便再次启用时恢复
pub fn disable(question: &mut Question) -> Change {
    match question.termination.as_mut() {
        Some(tree) if tree.enabled => {
            tree.enabled = false;
            debug!(question_id = %question.id, "termination rule disabled");
            Change::Dirty
        }
        _ => Change::Unchanged,
    }
}

/// 切换编辑模式
///
/// 简单 -> 高级：唯一的隐式条件成为第一个条件，不丢失数据。
/// 高级 -> 简单：有损操作，仅保留包含类条件的选项并集，合并为一个条件。
pub fn set_mode(tree: &mut ConditionTree, mode: RuleMode) -> Change {
    if tree.mode == mode {
        return Change::Unchanged;
    }

    if mode == RuleMode::Simple {
        let mut merged = Condition::include(Vec::<String>::new(), tree.operator);
        for condition in tree
            .conditions
            .iter()
            .filter(|c| c.condition_type == ConditionType::Include)
        {
            for code in &condition.operands {
                merged.insert(code.clone());
            }
        }
        let discarded = tree.conditions.len().saturating_sub(1);
        tree.conditions = if merged.is_active() {
            vec![merged]
        } else {
            Vec::new()
        };
        debug!(discarded, "collapsed advanced rule into simple mode");
    }

    tree.mode = mode;
    Change::Dirty
}

/// 简单模式下切换选项（选项勾选）
///
/// 作用于隐式包含条件，不存在时创建；切换后清理空条件。
pub fn toggle_option(tree: &mut ConditionTree, code: &str) -> Change {
    let index = match tree
        .conditions
        .iter()
        .position(|c| c.condition_type == ConditionType::Include)
    {
        Some(index) => index,
        None => {
            tree.conditions
                .push(Condition::include(Vec::<String>::new(), tree.operator));
            tree.conditions.len() - 1
        }
    };

    let selected = tree.conditions[index].toggle(code);
    tree.prune();
    debug!(code, selected, "option toggled");
    Change::Dirty
}

/// 高级模式下切换指定条件的选项，切换后清理空条件
pub fn toggle_operand(tree: &mut ConditionTree, index: usize, code: &str) -> Result<Change> {
    let condition = condition_mut(tree, index)?;
    let selected = condition.toggle(code);
    tree.prune();
    debug!(index, code, selected, "operand toggled");
    Ok(Change::Dirty)
}

/// 添加空条件（仅高级模式）
pub fn add_condition(tree: &mut ConditionTree) -> Result<Change> {
    require_advanced(tree, "add_condition")?;
    tree.conditions.push(Condition::empty());
    Ok(Change::Dirty)
}

/// 删除条件（仅高级模式）
pub fn remove_condition(tree: &mut ConditionTree, index: usize) -> Result<Change> {
    require_advanced(tree, "remove_condition")?;
    check_index(tree, index)?;
    tree.conditions.remove(index);
    Ok(Change::Dirty)
}

/// 切换条件类型（包含 <-> 排除，仅高级模式）
///
/// 简单模式的隐式条件恒为包含条件。
pub fn set_condition_type(tree: &mut ConditionTree, index: usize) -> Result<Change> {
    require_advanced(tree, "set_condition_type")?;
    let condition = condition_mut(tree, index)?;
    condition.condition_type = condition.condition_type.flipped();
    Ok(Change::Dirty)
}

/// 设置操作符
///
/// 简单模式下树级操作符同时作用于隐式条件，两者始终保持一致；
/// 条件级操作符只能在高级模式下单独设置。
pub fn set_operator(
    tree: &mut ConditionTree,
    target: OperatorTarget,
    value: LogicalOperator,
) -> Result<Change> {
    match target {
        OperatorTarget::Tree => {
            let mut changed = tree.operator != value;
            tree.operator = value;
            if tree.mode == RuleMode::Simple {
                for condition in &mut tree.conditions {
                    changed |= condition.operator != value;
                    condition.operator = value;
                }
            }
            Ok(Change::from_changed(changed))
        }
        OperatorTarget::Condition(index) => {
            require_advanced(tree, "set_operator")?;
            let condition = condition_mut(tree, index)?;
            let changed = condition.operator != value;
            condition.operator = value;
            Ok(Change::from_changed(changed))
        }
    }
}

/// 为表格题应用预设，表格规则不存在时创建
pub fn apply_table_pattern(question: &mut Question, pattern: TablePattern) -> Result<Change> {
    let col_count = question.grid.as_ref().map(|g| g.col_count()).unwrap_or(0);
    let tree = termination_mut(question)?;
    let rule = tree.table.get_or_insert_with(TableRule::default);
    let before = rule.clone();
    rule.apply_pattern(pattern, col_count);
    debug!(%pattern, col_count, "table pattern applied");
    Ok(Change::from_changed(*rule != before))
}

/// 设置表格规则的行过滤方式
pub fn set_table_row_filter(question: &mut Question, row_filter: RowFilter) -> Result<Change> {
    let tree = termination_mut(question)?;
    let rule = tree.table.get_or_insert_with(TableRule::default);
    Ok(Change::from_changed(rule.set_row_filter(row_filter)))
}

/// 切换表格规则的列编码
pub fn toggle_table_column(question: &mut Question, code: &str) -> Result<Change> {
    let tree = termination_mut(question)?;
    let rule = tree.table.get_or_insert_with(TableRule::default);
    rule.toggle_column(code);
    Ok(Change::Dirty)
}

/// 切换表格规则的具体行
pub fn toggle_table_row(question: &mut Question, row: usize) -> Result<Change> {
    let tree = termination_mut(question)?;
    let rule = tree.table.get_or_insert_with(TableRule::default);
    rule.toggle_row(row);
    Ok(Change::Dirty)
}

/// 获取问题的终止规则，未启用过时返回错误
pub fn termination_mut(question: &mut Question) -> Result<&mut ConditionTree> {
    let id = question.id.clone();
    question
        .termination
        .as_mut()
        .ok_or(RuleError::RuleNotConfigured(id))
}

fn require_advanced(tree: &ConditionTree, operation: &'static str) -> Result<()> {
    if tree.mode != RuleMode::Advanced {
        return Err(RuleError::AdvancedModeRequired(operation));
    }
    Ok(())
}

fn check_index(tree: &ConditionTree, index: usize) -> Result<()> {
    if index >= tree.conditions.len() {
        return Err(RuleError::ConditionIndexOutOfRange {
            index,
            len: tree.conditions.len(),
        });
    }
    Ok(())
}

fn condition_mut(tree: &mut ConditionTree, index: usize) -> Result<&mut Condition> {
    check_index(tree, index)?;
    Ok(&mut tree.conditions[index])
}
