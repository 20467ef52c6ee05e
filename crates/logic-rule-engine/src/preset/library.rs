//! 预设库
//!
//! 内置目录为只读；自定义预设按点数分组存放，可序列化后由宿主持久化。

use super::catalog::builtin_labels;
use super::models::{PresetKey, PresetSummary, ScaleFamily, ensure_supported};
use crate::error::{Result, RuleError};
use crate::models::{Grid, Question};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// 预设库
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetLibrary {
    /// 点数 -> 名称 -> 标签
    #[serde(default)]
    custom: BTreeMap<usize, BTreeMap<String, Vec<String>>>,
}

impl PresetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取预设标签（新分配的数组）
    pub fn labels(&self, key: &PresetKey, points: usize) -> Result<Vec<String>> {
        ensure_supported(points)?;

        match key {
            PresetKey::Builtin(family) => builtin_labels(*family, points)
                .map(|labels| labels.iter().map(|l| l.to_string()).collect())
                .ok_or(RuleError::UnsupportedPointCount(points)),
            PresetKey::Custom(name) => self
                .custom
                .get(&points)
                .and_then(|presets| presets.get(name))
                .cloned()
                .ok_or_else(|| RuleError::PresetNotFound(key.to_string())),
        }
    }

    /// 应用预设到表格题：直接设置列标签，表格不存在时创建
    ///
    /// 不修改终止规则；返回写入的标签。
    pub fn apply(&self, key: &PresetKey, points: usize, question: &mut Question) -> Result<Vec<String>> {
        let labels = self.labels(key, points)?;
        question.grid.get_or_insert_with(Grid::default).cols = labels.clone();
        debug!(question_id = %question.id, preset = %key, points, "scale preset applied");
        Ok(labels)
    }

    /// 保存自定义预设，同名自定义预设被覆盖；返回是否发生覆盖
    pub fn save_custom(
        &mut self,
        name: impl Into<String>,
        points: usize,
        labels: Vec<String>,
    ) -> Result<bool> {
        ensure_supported(points)?;
        if labels.len() != points {
            return Err(RuleError::LabelCountMismatch {
                expected: points,
                actual: labels.len(),
            });
        }

        let name = name.into();
        let replaced = self
            .custom
            .entry(points)
            .or_default()
            .insert(name.clone(), labels)
            .is_some();
        debug!(name = %name, points, replaced, "custom preset saved");
        Ok(replaced)
    }

    /// 删除自定义预设，返回被删除的标签
    pub fn remove_custom(&mut self, name: &str, points: usize) -> Result<Vec<String>> {
        let removed = self
            .custom
            .get_mut(&points)
            .and_then(|presets| presets.remove(name))
            .ok_or_else(|| RuleError::PresetNotFound(PresetKey::custom(name).to_string()))?;

        if self.custom.get(&points).is_some_and(BTreeMap::is_empty) {
            self.custom.remove(&points);
        }
        Ok(removed)
    }

    /// 列出指定点数下的全部预设：内置在前，自定义按名称排序
    pub fn list(&self, points: usize) -> Result<Vec<PresetSummary>> {
        ensure_supported(points)?;

        let mut summaries = Vec::new();
        for family in ScaleFamily::ALL {
            let key = PresetKey::Builtin(family);
            let labels = self.labels(&key, points)?;
            summaries.push(PresetSummary {
                key,
                label: family.label().to_string(),
                labels,
            });
        }

        if let Some(presets) = self.custom.get(&points) {
            for (name, labels) in presets {
                summaries.push(PresetSummary {
                    key: PresetKey::custom(name.clone()),
                    label: name.clone(),
                    labels: labels.clone(),
                });
            }
        }

        Ok(summaries)
    }
}
