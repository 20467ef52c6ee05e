//! 交叉表横幅列
//!
//! 横幅列携带编译后的方程字符串，由下游交叉表引擎按自身语法独立解析。

use crate::compiler::EquationCompiler;
use crate::error::Result;
use crate::models::ConditionTree;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 横幅列定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerColumn {
    pub id: String,
    pub name: String,
    #[serde(rename = "logic_equation", alias = "equation", default)]
    pub equation: String,
}

impl BannerColumn {
    /// 从条件树生成横幅列
    pub fn from_tree(name: impl Into<String>, tree: &ConditionTree) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            equation: EquationCompiler::new().compile(tree)?,
        })
    }

    /// 条件树修改后重新生成方程
    pub fn update_tree(&mut self, tree: &ConditionTree) -> Result<()> {
        self.equation = EquationCompiler::new().compile(tree)?;
        Ok(())
    }

    /// 重新打开方程为条件树
    pub fn tree(&self) -> Result<ConditionTree> {
        EquationCompiler::new().decompile(&self.equation)
    }
}
