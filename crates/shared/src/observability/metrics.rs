//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集。
//! 规则引擎作为库嵌入宿主程序运行，不单独暴露 HTTP 端口，
//! 宿主通过 [`MetricsHandle::render`] 获取文本快照。

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

use super::ObservabilityConfig;

/// 全局 Prometheus handle，用于渲染指标
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics 资源句柄
pub struct MetricsHandle {
    handle: PrometheusHandle,
}

impl MetricsHandle {
    /// 渲染 Prometheus 文本格式的指标快照
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// 安装 Prometheus recorder
pub fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = match PROMETHEUS_HANDLE.get() {
        Some(existing) => existing.clone(),
        None => {
            let handle = PrometheusBuilder::new().install_recorder()?;
            let _ = PROMETHEUS_HANDLE.set(handle.clone());
            handle
        }
    };

    register_common_metrics(&config.service_name);

    Ok(MetricsHandle { handle })
}

/// 注册规则引擎相关指标的描述
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!(
        "termination_evaluations_total",
        "Total number of termination rule evaluations"
    );
    metrics::describe_counter!(
        "termination_simulations_total",
        "Total number of batch termination simulations"
    );
    metrics::describe_histogram!(
        "termination_simulation_duration_seconds",
        "Batch termination simulation duration in seconds"
    );
    metrics::describe_counter!(
        "equation_decompile_failures_total",
        "Total number of equation strings that failed to decompile"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 获取全局 Prometheus handle（用于自定义渲染）
pub fn get_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}
