//! 终止规则批量模拟
//!
//! 按问卷顺序逐题评估受访者，命中第一条终止规则即停止。
//! 问题列表以不可变快照共享，受访者数量超过阈值时使用 rayon 并行评估。

use crate::evaluator::RuleEvaluator;
use crate::models::{AnswerSet, Question, Respondent, ResponseAnswer};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// 默认并行阈值
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// 单个受访者的模拟结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RespondentOutcome {
    pub respondent_id: String,
    /// 触发终止的问题 ID；完成问卷时为 `None`
    pub terminated_at: Option<String>,
}

/// 模拟报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub total: usize,
    pub completes: usize,
    /// 问题 ID -> 在该题终止的人数
    pub terminations_by_question: BTreeMap<String, usize>,
    /// (受访者 ID, 问题 ID)，保持输入顺序
    pub terminated: Vec<(String, String)>,
}

impl SimulationReport {
    pub fn terminations(&self) -> usize {
        self.terminated.len()
    }

    /// 完成率（无受访者时为 0）
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completes as f64 / self.total as f64
        }
    }

    fn record(&mut self, outcome: RespondentOutcome) {
        self.total += 1;
        match outcome.terminated_at {
            Some(question_id) => {
                *self
                    .terminations_by_question
                    .entry(question_id.clone())
                    .or_default() += 1;
                self.terminated.push((outcome.respondent_id, question_id));
            }
            None => self.completes += 1,
        }
    }
}

/// 终止规则模拟器
#[derive(Debug, Clone)]
pub struct TerminationSimulator {
    questions: Arc<Vec<Question>>,
    parallel_threshold: usize,
    trace_evaluations: bool,
}

impl TerminationSimulator {
    /// 创建模拟器，问题列表被快照，后续编辑不影响本次模拟
    pub fn new(questions: &[Question]) -> Self {
        Self {
            questions: Arc::new(questions.to_vec()),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            trace_evaluations: false,
        }
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// 输出每次规则评估的追踪日志（debug 级别）
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace_evaluations = enabled;
        self
    }

    /// 共享的问题快照
    pub fn questions(&self) -> Arc<Vec<Question>> {
        Arc::clone(&self.questions)
    }

    /// 评估单个受访者
    pub fn evaluate_respondent(&self, respondent: &Respondent) -> RespondentOutcome {
        let terminated_at = self
            .questions
            .iter()
            .find(|question| {
                let answer = respondent.answer_for(&question.id);
                let fired = question.should_terminate(answer);
                if self.trace_evaluations {
                    trace_evaluation(respondent, question, answer, fired);
                }
                fired
            })
            .map(|question| question.id.clone());

        RespondentOutcome {
            respondent_id: respondent.id.clone(),
            terminated_at,
        }
    }

    /// 批量模拟
    #[instrument(skip_all, fields(respondents = respondents.len(), questions = self.questions.len()))]
    pub fn run(&self, respondents: &[Respondent]) -> SimulationReport {
        let start = Instant::now();
        let parallel = respondents.len() > self.parallel_threshold;

        let outcomes: Vec<RespondentOutcome> = if parallel {
            respondents
                .par_iter()
                .map(|r| self.evaluate_respondent(r))
                .collect()
        } else {
            respondents
                .iter()
                .map(|r| self.evaluate_respondent(r))
                .collect()
        };

        let mut report = SimulationReport::default();
        for outcome in outcomes {
            report.record(outcome);
        }

        let elapsed = start.elapsed();
        metrics::counter!("termination_simulations_total").increment(1);
        metrics::histogram!("termination_simulation_duration_seconds")
            .record(elapsed.as_secs_f64());

        info!(
            total = report.total,
            completes = report.completes,
            terminations = report.terminations(),
            parallel,
            elapsed_ms = elapsed.as_millis() as u64,
            "termination simulation finished"
        );

        report
    }
}

fn trace_evaluation(
    respondent: &Respondent,
    question: &Question,
    answer: Option<&ResponseAnswer>,
    fired: bool,
) {
    let Some(tree) = question.termination.as_ref() else {
        return;
    };

    if let Some(rule) = &tree.table {
        debug!(
            respondent_id = %respondent.id,
            question_id = %question.id,
            rule = %rule.describe(),
            fired,
            "table rule evaluated"
        );
        return;
    }

    let empty = AnswerSet::new();
    let answers = match answer {
        Some(ResponseAnswer::Select(answers)) => answers,
        _ => &empty,
    };
    let catalog = (!question.options.is_empty()).then_some(question.options.as_slice());
    let result = RuleEvaluator::new()
        .with_trace()
        .execute_with_catalog(tree, answers, catalog);

    debug!(
        respondent_id = %respondent.id,
        question_id = %question.id,
        fired,
        trace = ?result.evaluation_trace,
        "rule evaluated"
    );
}
