//! 规则引擎领域模型
//!
//! 问题、选项、条件树以及受访者答案的内存表示。
//! 持久化字段名与问卷存储记录保持一致，所有新增字段都带有安全默认值。

use crate::operators::{ConditionType, LogicalOperator, RuleMode};
use crate::table::{RowFilter, TablePattern, TableRule, row_codes};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 答案选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub code: String,
    pub label: String,
}

impl AnswerOption {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// 条件：一组选项编码上的布尔原子
///
/// `operands` 具有集合语义，插入顺序仅用于展示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type", default)]
    pub condition_type: ConditionType,
    #[serde(rename = "options", alias = "operands", default)]
    pub operands: Vec<String>,
    #[serde(default)]
    pub operator: LogicalOperator,
}

impl Condition {
    pub fn new<I, S>(condition_type: ConditionType, operands: I, operator: LogicalOperator) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut condition = Self {
            condition_type,
            operands: Vec::new(),
            operator,
        };
        for code in operands {
            condition.insert(code);
        }
        condition
    }

    pub fn include<I, S>(operands: I, operator: LogicalOperator) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ConditionType::Include, operands, operator)
    }

    pub fn exclude<I, S>(operands: I, operator: LogicalOperator) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ConditionType::Exclude, operands, operator)
    }

    /// 空条件（编辑过程中的过渡状态）
    pub fn empty() -> Self {
        Self::include(Vec::<String>::new(), LogicalOperator::Or)
    }

    /// 是否为有效条件（至少一个选项）
    pub fn is_active(&self) -> bool {
        !self.operands.is_empty()
    }

    pub fn is_exclude(&self) -> bool {
        self.condition_type == ConditionType::Exclude
    }

    pub fn contains(&self, code: &str) -> bool {
        self.operands.iter().any(|c| c == code)
    }

    /// 添加选项，已存在时返回 false
    pub fn insert(&mut self, code: impl Into<String>) -> bool {
        let code = code.into();
        if self.contains(&code) {
            return false;
        }
        self.operands.push(code);
        true
    }

    /// 移除选项，不存在时返回 false
    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.operands.len();
        self.operands.retain(|c| c != code);
        self.operands.len() != before
    }

    /// 切换选项（对称差），返回切换后该选项是否被选中
    pub fn toggle(&mut self, code: &str) -> bool {
        if self.remove(code) {
            false
        } else {
            self.operands.push(code.to_string());
            true
        }
    }

    /// 去除重复选项，保留首次出现的顺序
    pub fn dedupe(&mut self) {
        let mut seen = HashSet::new();
        self.operands.retain(|c| seen.insert(c.clone()));
    }
}

fn default_enabled() -> bool {
    true
}

/// 条件树：一个问题的完整终止规则
///
/// 表格规则字段与条件字段平铺在同一条存储记录上；
/// 读取时也接受嵌套在 `table` 下的写法。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredConditionTree")]
pub struct ConditionTree {
    pub enabled: bool,
    pub mode: RuleMode,
    pub operator: LogicalOperator,
    pub conditions: Vec<Condition>,
    /// 表格题扩展：行量词 × 列编码
    #[serde(flatten)]
    pub table: Option<TableRule>,
}

/// 条件树的存储记录
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredConditionTree {
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default)]
    mode: RuleMode,
    #[serde(default)]
    operator: LogicalOperator,
    #[serde(default)]
    conditions: Vec<Condition>,
    #[serde(default)]
    table: Option<TableRule>,
    row_filter: Option<RowFilter>,
    #[serde(default, with = "row_codes")]
    specific_rows: Vec<usize>,
    column_codes: Option<Vec<String>>,
    #[serde(alias = "pattern")]
    table_pattern: Option<TablePattern>,
}

impl From<StoredConditionTree> for ConditionTree {
    fn from(stored: StoredConditionTree) -> Self {
        let flat = stored.row_filter.is_some()
            || stored.column_codes.is_some()
            || stored.table_pattern.is_some()
            || !stored.specific_rows.is_empty();

        // 嵌套写法优先
        let table = stored.table.or_else(|| {
            flat.then(|| TableRule {
                row_filter: stored.row_filter.unwrap_or_default(),
                specific_rows: stored.specific_rows,
                column_codes: stored.column_codes.unwrap_or_default(),
                pattern: stored.table_pattern.unwrap_or_default(),
            })
        });

        Self {
            enabled: stored.enabled,
            mode: stored.mode,
            operator: stored.operator,
            conditions: stored.conditions,
            table,
        }
    }
}

impl Default for ConditionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionTree {
    /// 默认规则：启用、简单模式、OR、无条件
    pub fn new() -> Self {
        Self {
            enabled: true,
            mode: RuleMode::Simple,
            operator: LogicalOperator::Or,
            conditions: Vec::new(),
            table: None,
        }
    }

    /// 简单模式规则：所有选中项构成单个包含条件
    pub fn simple<I, S>(operator: LogicalOperator, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let condition = Condition::include(codes, operator);
        Self {
            operator,
            conditions: if condition.is_active() {
                vec![condition]
            } else {
                Vec::new()
            },
            ..Self::new()
        }
    }

    /// 高级模式规则
    pub fn advanced(operator: LogicalOperator, conditions: Vec<Condition>) -> Self {
        Self {
            mode: RuleMode::Advanced,
            operator,
            conditions,
            ..Self::new()
        }
    }

    /// 参与评估的条件（空条件被忽略）
    pub fn active_conditions(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter().filter(|c| c.is_active())
    }

    /// 移除空条件，返回是否有条件被移除
    pub fn prune(&mut self) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(Condition::is_active);
        self.conditions.len() != before
    }
}

/// 表格题的行列定义
///
/// 列编码为从 1 开始的位置序号。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Grid {
    #[serde(default)]
    pub rows: Vec<String>,
    #[serde(default)]
    pub cols: Vec<String>,
}

impl Grid {
    pub fn new<R, C, S, T>(rows: R, cols: C) -> Self
    where
        R: IntoIterator<Item = S>,
        C: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
            cols: cols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols.len()
    }

    /// 列位置（从 0 开始）对应的编码
    pub fn column_code(index: usize) -> String {
        (index + 1).to_string()
    }

    /// 编码是否指向存在的列
    pub fn is_valid_column(&self, code: &str) -> bool {
        code.parse::<usize>()
            .map(|n| n >= 1 && n <= self.cols.len())
            .unwrap_or(false)
    }
}

/// 问题类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[default]
    Single,
    Multi,
    Grid,
    /// 李克特量表表格
    LikertGrid,
}

/// 问题
///
/// 终止规则由问题独占持有，没有独立于问题的生命周期。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    #[serde(
        default,
        rename = "globalTermination",
        alias = "termination",
        skip_serializing_if = "Option::is_none"
    )]
    pub termination: Option<ConditionTree>,
}

impl Question {
    pub fn new(id: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            kind,
            options: Vec::new(),
            grid: None,
            termination: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_options<I, C, L>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|(code, label)| AnswerOption::new(code, label))
            .collect();
        self
    }

    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn with_termination(mut self, tree: ConditionTree) -> Self {
        self.termination = Some(tree);
        self
    }

    pub fn is_grid(&self) -> bool {
        matches!(self.kind, QuestionKind::Grid | QuestionKind::LikertGrid) || self.grid.is_some()
    }

    pub fn has_option(&self, code: &str) -> bool {
        self.options.iter().any(|o| o.code == code)
    }
}

/// 受访者在单选/多选题上选中的编码集合
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(HashSet<String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn insert(&mut self, code: impl Into<String>) -> bool {
        self.0.insert(code.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// 受访者在表格题上的作答：行序号（从 0 开始） -> 列编码
///
/// JSON 对象的键总是字符串，反序列化时经由字符串键转换，
/// 以便在 untagged 枚举中同样可用。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, String>")]
pub struct GridAnswers(HashMap<usize, String>);

impl TryFrom<HashMap<String, String>> for GridAnswers {
    type Error = String;

    fn try_from(raw: HashMap<String, String>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(row, code)| {
                row.trim()
                    .parse::<usize>()
                    .map(|row| (row, code))
                    .map_err(|_| format!("无效的行序号: '{}'", row))
            })
            .collect::<Result<HashMap<_, _>, _>>()
            .map(Self)
    }
}

impl GridAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        self.0.get(&row).map(String::as_str)
    }

    pub fn insert(&mut self, row: usize, code: impl Into<String>) -> Option<String> {
        self.0.insert(row, code.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for GridAnswers {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(r, c)| (r, c.into())).collect())
    }
}

/// 单个问题的作答
///
/// JSON 中数组表示选择题作答，对象表示表格题作答；缺失作答等价于空值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseAnswer {
    Select(AnswerSet),
    Grid(GridAnswers),
}

impl Default for ResponseAnswer {
    fn default() -> Self {
        Self::Select(AnswerSet::default())
    }
}

/// 受访者记录
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Respondent {
    pub id: String,
    #[serde(default)]
    pub answers: HashMap<String, ResponseAnswer>,
}

impl Respondent {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            answers: HashMap::new(),
        }
    }

    pub fn with_answer(mut self, question_id: impl Into<String>, answer: ResponseAnswer) -> Self {
        self.answers.insert(question_id.into(), answer);
        self
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&ResponseAnswer> {
        self.answers.get(question_id)
    }
}
