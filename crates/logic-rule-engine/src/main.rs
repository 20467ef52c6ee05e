//! 规则引擎命令行工具
//!
//! 对问卷文档执行终止模拟、导出规则方程，或把方程还原为条件树。

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use logic_engine::{EquationCompiler, Question, Respondent, TerminationSimulator};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use survey_shared::config::{AppConfig, EngineConfig};
use survey_shared::observability;
use tracing::{info, instrument, warn};

const SERVICE_NAME: &str = "rule-engine";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 覆盖配置中的并行阈值
    #[arg(long, global = true)]
    parallel_threshold: Option<usize>,

    /// 结束时输出 Prometheus 指标快照（需启用 metrics）
    #[arg(long, global = true)]
    print_metrics: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 对问卷中的受访者执行终止规则模拟
    Simulate {
        /// 问卷文档（JSON，包含 questions 与 respondents）
        document: PathBuf,
    },
    /// 输出每个已启用规则的方程
    Compile {
        document: PathBuf,
    },
    /// 把方程还原为条件树 JSON
    Decompile {
        equation: String,
    },
}

/// 问卷文档
#[derive(Debug, Deserialize)]
struct QuestionnaireDocument {
    #[serde(default)]
    questions: Vec<Question>,
    #[serde(default)]
    respondents: Vec<Respondent>,
}

#[instrument]
fn load_document(path: &Path) -> Result<QuestionnaireDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("读取问卷文档失败: {}", path.display()))?;
    let document: QuestionnaireDocument = serde_json::from_str(&raw)
        .with_context(|| format!("解析问卷文档失败: {}", path.display()))?;

    info!(
        questions = document.questions.len(),
        respondents = document.respondents.len(),
        "questionnaire document loaded"
    );
    Ok(document)
}

fn simulate(path: &Path, engine: &EngineConfig) -> Result<()> {
    let document = load_document(path)?;
    let report = TerminationSimulator::new(&document.questions)
        .with_parallel_threshold(engine.parallel_threshold)
        .with_trace(engine.trace_evaluations)
        .run(&document.respondents);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn compile(path: &Path) -> Result<()> {
    let document = load_document(path)?;
    let compiler = EquationCompiler::new();

    for question in &document.questions {
        let Some(tree) = question.termination.as_ref().filter(|t| t.enabled) else {
            continue;
        };

        match &tree.table {
            Some(rule) => println!("{}\t{}", question.id, rule.describe()),
            None => {
                let equation = compiler
                    .compile(tree)
                    .with_context(|| format!("编译问题 {} 的规则失败", question.id))?;
                println!("{}\t{}", question.id, equation);
            }
        }
    }
    Ok(())
}

fn decompile(equation: &str) -> Result<()> {
    let tree = EquationCompiler::new()
        .decompile(equation)
        .with_context(|| format!("无法还原方程: {}", equation))?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 配置文件缺失或损坏时使用默认值，命令本身仍可执行
    let config = AppConfig::load(SERVICE_NAME).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    let obs_config = config.observability.clone().with_service_name(SERVICE_NAME);
    let guard = observability::init(&obs_config)?;

    let mut engine = config.engine.clone();
    if let Some(threshold) = cli.parallel_threshold {
        engine.parallel_threshold = threshold;
    }

    match &cli.command {
        Commands::Simulate { document } => simulate(document, &engine)?,
        Commands::Compile { document } => compile(document)?,
        Commands::Decompile { equation } => decompile(equation)?,
    }

    if cli.print_metrics {
        match guard.render_metrics() {
            Some(snapshot) => eprintln!("{}", snapshot),
            None => warn!("metrics are disabled; set observability.metrics_enabled = true"),
        }
    }

    Ok(())
}
