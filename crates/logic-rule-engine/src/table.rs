//! 表格题规则扩展
//!
//! 为矩阵/李克特表格题提供 行量词 × 列编码 的终止规则：
//! 每一行的命中条件是该行所选列编码属于 `column_codes`，
//! 再由 `row_filter` 决定需要多少行命中。
//!
//! `specific` 只支持“所选行全部命中”的语义，“所选行任一命中”无法表达。

use crate::models::{Grid, GridAnswers};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::trace;

/// 行过滤方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowFilter {
    #[default]
    All,
    Any,
    Specific,
}

impl fmt::Display for RowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Any => write!(f, "any"),
            Self::Specific => write!(f, "specific"),
        }
    }
}

/// 表格题预设模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TablePattern {
    /// 至少一行必须为前两档（T2B）
    MustT2bAny,
    /// 所有行必须为前两档
    MustT2bAll,
    /// 不能所有行都为后两档（B2B）
    CannotB2bAll,
    /// 不能所有行都为中立
    CannotNeutralAll,
    #[default]
    Custom,
}

/// 预设的终止方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// 量词条件不成立时终止
    Must,
    /// 量词条件成立时终止
    Cannot,
}

impl TablePattern {
    pub const PRESETS: [TablePattern; 4] = [
        Self::MustT2bAny,
        Self::MustT2bAll,
        Self::CannotB2bAll,
        Self::CannotNeutralAll,
    ];

    pub fn requirement(self) -> Requirement {
        match self {
            Self::MustT2bAny | Self::MustT2bAll => Requirement::Must,
            Self::CannotB2bAll | Self::CannotNeutralAll | Self::Custom => Requirement::Cannot,
        }
    }

    /// 按量表宽度展开为 (行过滤, 列编码)；`custom` 没有固定展开
    ///
    /// 前两档为最大的两个编码，后两档为最小的两个编码，
    /// 中立为中间编码（偶数点量表取中间两个编码）。
    pub fn expand(self, col_count: usize) -> Option<(RowFilter, Vec<String>)> {
        let n = col_count;
        let codes: Vec<usize> = match self {
            Self::MustT2bAny | Self::MustT2bAll => (n.saturating_sub(1).max(1)..=n).collect(),
            Self::CannotB2bAll => (1..=n.min(2)).collect(),
            Self::CannotNeutralAll => {
                if n == 0 {
                    Vec::new()
                } else if n % 2 == 1 {
                    vec![n.div_ceil(2)]
                } else {
                    vec![n / 2, n / 2 + 1]
                }
            }
            Self::Custom => return None,
        };

        let row_filter = match self {
            Self::MustT2bAny => RowFilter::Any,
            _ => RowFilter::All,
        };

        Some((row_filter, codes.into_iter().map(|c| c.to_string()).collect()))
    }

    /// 人类可读的规则描述
    pub fn describe(self) -> &'static str {
        match self {
            Self::MustT2bAny => "Must be T2B for at least 1 statement",
            Self::MustT2bAll => "Must be T2B for ALL statements",
            Self::CannotB2bAll => "Cannot be B2B for ALL statements",
            Self::CannotNeutralAll => "Cannot be Neutral for ALL statements",
            Self::Custom => "Custom rule",
        }
    }

    /// 根据列标签措辞判断可用的预设
    ///
    /// 同意类量表提供全部预设；满意度量表没有中立预设；其他量表只能自定义。
    pub fn available_for(cols: &[String]) -> Vec<TablePattern> {
        if cols.iter().any(|c| AGREEMENT_WORDING.is_match(c)) {
            let mut patterns = Self::PRESETS.to_vec();
            patterns.push(Self::Custom);
            patterns
        } else if cols.iter().any(|c| SATISFACTION_WORDING.is_match(c)) {
            vec![
                Self::MustT2bAny,
                Self::MustT2bAll,
                Self::CannotB2bAll,
                Self::Custom,
            ]
        } else {
            vec![Self::Custom]
        }
    }
}

impl fmt::Display for TablePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MustT2bAny => "must_t2b_any",
            Self::MustT2bAll => "must_t2b_all",
            Self::CannotB2bAll => "cannot_b2b_all",
            Self::CannotNeutralAll => "cannot_neutral_all",
            Self::Custom => "custom",
        };
        write!(f, "{}", s)
    }
}

static AGREEMENT_WORDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)agree|disagree|strongly|somewhat|neither").expect("valid regex literal")
});

static SATISFACTION_WORDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)satisfied|dissatisfied").expect("valid regex literal")
});

/// 表格题终止规则
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRule {
    #[serde(default)]
    pub row_filter: RowFilter,
    /// 仅在 `row_filter == specific` 时生效的行序号（从 0 开始）
    ///
    /// 存储记录中为从 1 开始的行编码字符串，见 [`row_codes`]。
    #[serde(default, with = "row_codes")]
    pub specific_rows: Vec<usize>,
    #[serde(default)]
    pub column_codes: Vec<String>,
    #[serde(default, rename = "tablePattern", alias = "pattern")]
    pub pattern: TablePattern,
}

impl TableRule {
    pub fn new<I, S>(row_filter: RowFilter, column_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rule = Self {
            row_filter,
            ..Default::default()
        };
        for code in column_codes {
            let code = code.into();
            if !rule.column_codes.contains(&code) {
                rule.column_codes.push(code);
            }
        }
        rule
    }

    /// 从预设生成独立的规则实例（与预设没有后续关联）
    pub fn from_pattern(pattern: TablePattern, col_count: usize) -> Self {
        let mut rule = Self::default();
        rule.apply_pattern(pattern, col_count);
        rule
    }

    /// 应用预设：覆盖行过滤与列编码，保留已选的具体行
    pub fn apply_pattern(&mut self, pattern: TablePattern, col_count: usize) {
        if let Some((row_filter, column_codes)) = pattern.expand(col_count) {
            self.row_filter = row_filter;
            self.column_codes = column_codes;
        }
        self.pattern = pattern;
    }

    /// 设置行过滤方式，手动修改后规则视为自定义
    pub fn set_row_filter(&mut self, row_filter: RowFilter) -> bool {
        if self.row_filter == row_filter {
            return false;
        }
        self.row_filter = row_filter;
        self.pattern = TablePattern::Custom;
        true
    }

    /// 切换列编码，返回切换后该列是否被选中
    pub fn toggle_column(&mut self, code: &str) -> bool {
        self.pattern = TablePattern::Custom;
        if let Some(pos) = self.column_codes.iter().position(|c| c == code) {
            self.column_codes.remove(pos);
            false
        } else {
            self.column_codes.push(code.to_string());
            true
        }
    }

    /// 切换具体行，返回切换后该行是否被选中
    pub fn toggle_row(&mut self, row: usize) -> bool {
        if let Some(pos) = self.specific_rows.iter().position(|r| *r == row) {
            self.specific_rows.remove(pos);
            false
        } else {
            self.specific_rows.push(row);
            true
        }
    }

    /// 终止方向：预设决定，自定义规则在量词成立时终止
    pub fn requirement(&self) -> Requirement {
        self.pattern.requirement()
    }

    /// 根据终止方向判断是否终止
    pub fn terminates(&self, grid: &Grid, answers: &GridAnswers) -> bool {
        let holds = evaluate_table(self, grid, answers);
        match self.requirement() {
            Requirement::Must => !holds,
            Requirement::Cannot => holds,
        }
    }

    /// 人类可读的方程描述，如 `4|5 for ANY rows`
    pub fn describe(&self) -> String {
        match self.pattern {
            TablePattern::Custom => format!(
                "{} for {} rows",
                self.column_codes.join("|"),
                self.row_filter.to_string().to_uppercase()
            ),
            pattern => pattern.describe().to_string(),
        }
    }
}

/// 具体行的存储格式
///
/// 存储记录以行编码保存（`"1"` 表示第一行），内存中使用从 0 开始的行序号。
/// 读取时同时接受整数形式的行序号。
pub mod row_codes {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoredRow {
        Code(String),
        Index(usize),
    }

    pub fn serialize<S: Serializer>(rows: &[usize], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(rows.iter().map(|row| (row + 1).to_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<usize>, D::Error> {
        Vec::<StoredRow>::deserialize(deserializer)?
            .into_iter()
            .map(|row| match row {
                StoredRow::Index(index) => Ok(index),
                StoredRow::Code(code) => code
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .ok_or_else(|| D::Error::custom(format!("无效的行编码: '{}'", code))),
            })
            .collect()
    }
}

/// 单行是否命中：作答存在、列编码有效且属于规则列集合
fn row_hits(rule: &TableRule, grid: &Grid, answers: &GridAnswers, row: usize) -> bool {
    if row >= grid.row_count() {
        return false;
    }
    match answers.get(row) {
        Some(code) => grid.is_valid_column(code) && rule.column_codes.iter().any(|c| c == code),
        None => false,
    }
}

/// 评估表格题规则的量词条件
///
/// - 缺失作答的行视为未命中；
/// - 没有适用行时结果为 false（包括 `specific` 未选择任何行）。
pub fn evaluate_table(rule: &TableRule, grid: &Grid, answers: &GridAnswers) -> bool {
    let result = match rule.row_filter {
        RowFilter::All => {
            grid.row_count() > 0
                && (0..grid.row_count()).all(|row| row_hits(rule, grid, answers, row))
        }
        RowFilter::Any => (0..grid.row_count()).any(|row| row_hits(rule, grid, answers, row)),
        RowFilter::Specific => {
            !rule.specific_rows.is_empty()
                && rule
                    .specific_rows
                    .iter()
                    .all(|&row| row_hits(rule, grid, answers, row))
        }
    };

    trace!(
        row_filter = %rule.row_filter,
        pattern = %rule.pattern,
        result,
        "table rule evaluated"
    );

    result
}
