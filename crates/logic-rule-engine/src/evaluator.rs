//! 规则评估器
//!
//! 给定条件树与受访者的作答集合，计算终止规则是否触发。
//! 评估是纯函数：不依赖条件或选项的顺序，不修改规则，可以在多线程中并发执行。

use crate::models::{AnswerOption, AnswerSet, Condition, ConditionTree, Question, ResponseAnswer};
use crate::operators::LogicalOperator;
use crate::table;
use serde::Serialize;
use std::collections::HashSet;
use tracing::trace;

/// 条件评估器
///
/// 单个条件的命中逻辑；`catalog` 为当前问题的有效编码集合，
/// 不在其中的编码（选项被删除后的残留引用）视为永不满足。
///
/// 失效编码按选项级处理：排除条件中的失效编码同样“未被选中”，
/// 因此只含失效编码的排除条件（如 `NOT 9`）恒为真。
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估条件的有效真值，空条件返回 None（不参与组合）
    pub fn evaluate(
        condition: &Condition,
        answers: &AnswerSet,
        catalog: Option<&HashSet<&str>>,
    ) -> Option<bool> {
        if !condition.is_active() {
            return None;
        }

        let satisfied = |code: &String| {
            answers.contains(code) && catalog.is_none_or(|valid| valid.contains(code.as_str()))
        };

        let hit = match condition.operator {
            LogicalOperator::And => condition.operands.iter().all(satisfied),
            LogicalOperator::Or => condition.operands.iter().any(satisfied),
        };

        Some(if condition.is_exclude() { !hit } else { hit })
    }
}

/// 评估结果（带追踪信息）
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationResult {
    pub matched: bool,
    /// 有效真值为 true 的条件下标
    pub matched_conditions: Vec<usize>,
    /// 因无选项而被忽略的条件下标
    pub vacuous_conditions: Vec<usize>,
    pub evaluation_trace: Vec<String>,
}

/// 规则评估器
#[derive(Debug, Clone, Default)]
pub struct RuleEvaluator {
    /// 是否记录详细评估追踪
    trace_enabled: bool,
}

impl RuleEvaluator {
    pub fn new() -> Self {
        Self {
            trace_enabled: false,
        }
    }

    /// 启用评估追踪
    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    /// 执行规则评估并返回详细结果
    pub fn execute(&self, tree: &ConditionTree, answers: &AnswerSet) -> EvaluationResult {
        self.execute_with_catalog(tree, answers, None)
    }

    /// 在选项目录约束下执行规则评估
    pub fn execute_with_catalog(
        &self,
        tree: &ConditionTree,
        answers: &AnswerSet,
        catalog: Option<&[AnswerOption]>,
    ) -> EvaluationResult {
        let mut result = EvaluationResult::default();

        if !tree.enabled {
            if self.trace_enabled {
                result.evaluation_trace.push("rule disabled => NOT_MATCHED".to_string());
            }
            return result;
        }

        let valid_codes: Option<HashSet<&str>> =
            catalog.map(|options| options.iter().map(|o| o.code.as_str()).collect());

        let mut truths = Vec::with_capacity(tree.conditions.len());
        for (i, condition) in tree.conditions.iter().enumerate() {
            match ConditionEvaluator::evaluate(condition, answers, valid_codes.as_ref()) {
                Some(truth) => {
                    if truth {
                        result.matched_conditions.push(i);
                    }
                    if self.trace_enabled {
                        result.evaluation_trace.push(format!(
                            "conditions[{}]: {} {} ({}) => {}",
                            i,
                            condition.condition_type,
                            condition.operands.join(","),
                            condition.operator,
                            if truth { "MATCHED" } else { "NOT_MATCHED" }
                        ));
                    }
                    truths.push(truth);
                }
                None => {
                    result.vacuous_conditions.push(i);
                    if self.trace_enabled {
                        result
                            .evaluation_trace
                            .push(format!("conditions[{}]: 空条件, 忽略", i));
                    }
                }
            }
        }

        result.matched = !truths.is_empty() && tree.operator.combine(truths);

        if self.trace_enabled {
            result.evaluation_trace.push(format!(
                "root: {} => {}",
                tree.operator,
                if result.matched { "MATCHED" } else { "NOT_MATCHED" }
            ));
        }

        trace!(
            matched = result.matched,
            conditions = tree.conditions.len(),
            "condition tree evaluated"
        );

        result
    }
}

/// 评估条件树
///
/// 规则未启用或没有有效条件时返回 false。
pub fn evaluate(tree: &ConditionTree, answers: &AnswerSet) -> bool {
    RuleEvaluator::new().execute(tree, answers).matched
}

/// 在选项目录约束下评估条件树
pub fn evaluate_with_catalog(
    tree: &ConditionTree,
    answers: &AnswerSet,
    catalog: &[AnswerOption],
) -> bool {
    RuleEvaluator::new()
        .execute_with_catalog(tree, answers, Some(catalog))
        .matched
}

impl Question {
    /// 判断受访者在本题的作答是否触发终止
    ///
    /// - 未配置或未启用规则：不终止；
    /// - 表格题且配置了表格规则：按表格规则及其终止方向判断；
    /// - 其他情况：按条件树评估，选项目录为空时不做编码校验。
    pub fn should_terminate(&self, answer: Option<&ResponseAnswer>) -> bool {
        let Some(tree) = self.termination.as_ref().filter(|t| t.enabled) else {
            return false;
        };

        let terminated = match (&tree.table, &self.grid) {
            (Some(rule), Some(grid)) => {
                let empty = Default::default();
                let answers = match answer {
                    Some(ResponseAnswer::Grid(answers)) => answers,
                    _ => &empty,
                };
                rule.terminates(grid, answers)
            }
            _ => {
                let empty = AnswerSet::new();
                let answers = match answer {
                    Some(ResponseAnswer::Select(answers)) => answers,
                    _ => &empty,
                };
                if self.options.is_empty() {
                    evaluate(tree, answers)
                } else {
                    evaluate_with_catalog(tree, answers, &self.options)
                }
            }
        };

        metrics::counter!(
            "termination_evaluations_total",
            "outcome" => if terminated { "terminated" } else { "passed" }
        )
        .increment(1);

        terminated
    }

    /// 表格题规则的量词条件（不含终止方向），非表格题返回 None
    pub fn evaluate_table(&self, answer: Option<&ResponseAnswer>) -> Option<bool> {
        let tree = self.termination.as_ref()?;
        let rule = tree.table.as_ref()?;
        let grid = self.grid.as_ref()?;
        let empty = Default::default();
        let answers = match answer {
            Some(ResponseAnswer::Grid(answers)) => answers,
            _ => &empty,
        };
        Some(tree.enabled && table::evaluate_table(rule, grid, answers))
    }
}
