//! 方程编译器
//!
//! 条件树与扁平方程字符串之间的双向转换。方程供交叉表引擎独立解析，
//! 因此必须是不依赖外部绑定的合法文本；反编译用于重新打开已保存的规则。
//!
//! 对编辑器产生的任何条件树，`decompile(compile(tree))` 与原树在所有答案集上求值一致，
//! 文本形式不要求相同。

use crate::error::{Result, RuleError};
use crate::models::{Condition, ConditionTree};
use crate::operators::{ConditionType, LogicalOperator};
use crate::parser::{self, Expr};
use tracing::{debug, warn};

/// 方程编译器
#[derive(Debug, Clone, Copy, Default)]
pub struct EquationCompiler;

impl EquationCompiler {
    pub fn new() -> Self {
        Self
    }

    /// 编译条件树为方程字符串
    ///
    /// 空条件被忽略；没有有效条件时返回空字符串。
    /// 多选项条件仅在存在多个有效条件或为排除条件时加括号。
    pub fn compile(&self, tree: &ConditionTree) -> Result<String> {
        let active: Vec<&Condition> = tree.active_conditions().collect();
        let grouped = active.len() > 1;

        let mut parts = Vec::with_capacity(active.len());
        for condition in &active {
            for code in &condition.operands {
                validate_operand(code)?;
            }

            let joined = condition
                .operands
                .join(&format!(" {} ", condition.operator));
            let body = if condition.operands.len() > 1 && (grouped || condition.is_exclude()) {
                format!("({})", joined)
            } else {
                joined
            };

            parts.push(match condition.condition_type {
                ConditionType::Include => body,
                ConditionType::Exclude => format!("NOT {}", body),
            });
        }

        Ok(parts.join(&format!(" {} ", tree.operator)))
    }

    /// 反编译方程字符串为条件树
    ///
    /// 空白方程返回默认空规则；语法错误返回 `EquationParse`；
    /// 超出条件树表达能力的嵌套结构返回 `UnsupportedEquation`。
    pub fn decompile(&self, equation: &str) -> Result<ConditionTree> {
        let result = parser::parse(equation).and_then(|expr| match expr {
            Some(expr) => lower(expr),
            None => Ok(ConditionTree::new()),
        });

        match &result {
            Ok(tree) => debug!(
                equation,
                mode = %tree.mode,
                conditions = tree.conditions.len(),
                "equation decompiled"
            ),
            Err(e) => {
                metrics::counter!("equation_decompile_failures_total").increment(1);
                warn!(equation, error = %e, "equation decompile failed");
            }
        }

        result
    }
}

/// 编译条件树（使用默认编译器）
pub fn compile(tree: &ConditionTree) -> Result<String> {
    EquationCompiler::new().compile(tree)
}

/// 反编译方程（使用默认编译器）
pub fn decompile(equation: &str) -> Result<ConditionTree> {
    EquationCompiler::new().decompile(equation)
}

/// 选项编码必须能作为独立词法单元出现在方程中
pub fn validate_operand(code: &str) -> Result<()> {
    let invalid = code.is_empty()
        || code.chars().any(|c| c.is_whitespace() || c == '(' || c == ')')
        || parser::is_keyword(code);
    if invalid {
        return Err(RuleError::InvalidOperandCode(code.to_string()));
    }
    Ok(())
}

fn lower(expr: Expr) -> Result<ConditionTree> {
    match expr {
        Expr::Code(code) => Ok(ConditionTree::simple(LogicalOperator::Or, [code])),
        Expr::Not(inner) => Ok(ConditionTree::advanced(
            LogicalOperator::Or,
            vec![lower_condition(Expr::Not(inner))?],
        )),
        Expr::Chain(op, items) => {
            if let Some(codes) = bare_codes(&items) {
                return Ok(ConditionTree::simple(op, codes));
            }
            let conditions = items
                .into_iter()
                .map(lower_condition)
                .collect::<Result<Vec<_>>>()?;
            Ok(ConditionTree::advanced(op, conditions))
        }
    }
}

fn lower_condition(expr: Expr) -> Result<Condition> {
    match expr {
        Expr::Code(code) => Ok(Condition::include([code], LogicalOperator::Or)),
        Expr::Not(inner) => match *inner {
            Expr::Code(code) => Ok(Condition::exclude([code], LogicalOperator::Or)),
            // 双重否定
            Expr::Not(double) => lower_condition(*double),
            Expr::Chain(op, items) => match bare_codes(&items) {
                Some(codes) => Ok(Condition::exclude(codes, op)),
                None => Err(unsupported(&Expr::Not(Box::new(Expr::Chain(op, items))))),
            },
        },
        Expr::Chain(op, items) => match bare_codes(&items) {
            Some(codes) => Ok(Condition::include(codes, op)),
            None => Err(unsupported(&Expr::Chain(op, items))),
        },
    }
}

/// 全部为裸编码时返回编码列表
fn bare_codes(items: &[Expr]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| item.as_code().map(str::to_string))
        .collect()
}

fn unsupported(expr: &Expr) -> RuleError {
    RuleError::UnsupportedEquation(render(expr))
}

/// 表达式的规范文本，仅用于错误信息
fn render(expr: &Expr) -> String {
    match expr {
        Expr::Code(code) => code.clone(),
        Expr::Not(inner) => format!("NOT {}", render(inner)),
        Expr::Chain(op, items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| match item {
                    Expr::Chain(..) => format!("({})", render(item)),
                    _ => render(item),
                })
                .collect();
            parts.join(&format!(" {} ", op))
        }
    }
}
