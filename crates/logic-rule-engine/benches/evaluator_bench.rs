//! 规则评估器性能基准测试
//!
//! 针对条件树评估、表格规则评估以及方程编译/反编译的细粒度性能测试。

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use logic_engine::{
    AnswerSet, Condition, ConditionTree, EquationCompiler, Grid, GridAnswers, LogicalOperator,
    RowFilter, TableRule, evaluate, evaluate_table,
};
use std::hint::black_box;

fn codes(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|c| c.to_string()).collect()
}

/// 创建包含 n 个条件的高级模式规则
fn create_advanced_tree(conditions: usize) -> ConditionTree {
    let conditions = (0..conditions)
        .map(|i| {
            let operands = codes(i * 3 + 1..i * 3 + 4);
            if i % 3 == 2 {
                Condition::exclude(operands, LogicalOperator::Or)
            } else {
                Condition::include(operands, LogicalOperator::Or)
            }
        })
        .collect();
    ConditionTree::advanced(LogicalOperator::And, conditions)
}

fn bench_simple_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple_evaluation");

    let tree = ConditionTree::simple(LogicalOperator::Or, ["2", "3"]);
    let hit: AnswerSet = ["3"].into_iter().collect();
    let miss: AnswerSet = ["1"].into_iter().collect();

    group.bench_function("hit", |b| {
        b.iter(|| evaluate(black_box(&tree), black_box(&hit)))
    });
    group.bench_function("miss", |b| {
        b.iter(|| evaluate(black_box(&tree), black_box(&miss)))
    });

    group.finish();
}

fn bench_advanced_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("advanced_evaluation");

    for conditions in [2usize, 8, 32] {
        let tree = create_advanced_tree(conditions);
        let answers: AnswerSet = codes(1..conditions * 3 + 1).into_iter().step_by(2).collect();

        group.throughput(Throughput::Elements(conditions as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(conditions),
            &(tree, answers),
            |b, (tree, answers)| b.iter(|| evaluate(black_box(tree), black_box(answers))),
        );
    }

    group.finish();
}

fn bench_table_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_evaluation");

    for rows in [5usize, 20, 100] {
        let grid = Grid::new(
            (0..rows).map(|r| format!("statement {}", r)),
            codes(1..6),
        );
        let answers: GridAnswers = (0..rows).map(|r| (r, ((r % 5) + 1).to_string())).collect();

        for filter in [RowFilter::All, RowFilter::Any] {
            let rule = TableRule::new(filter, ["4", "5"]);
            group.throughput(Throughput::Elements(rows as u64));
            group.bench_with_input(
                BenchmarkId::new(filter.to_string(), rows),
                &(rule, grid.clone(), answers.clone()),
                |b, (rule, grid, answers)| {
                    b.iter(|| evaluate_table(black_box(rule), black_box(grid), black_box(answers)))
                },
            );
        }
    }

    group.finish();
}

fn bench_equation(c: &mut Criterion) {
    let mut group = c.benchmark_group("equation");
    let compiler = EquationCompiler::new();

    for conditions in [2usize, 8, 32] {
        let tree = create_advanced_tree(conditions);
        let equation = compiler.compile(&tree).unwrap_or_default();

        group.bench_with_input(
            BenchmarkId::new("compile", conditions),
            &tree,
            |b, tree| b.iter(|| compiler.compile(black_box(tree))),
        );
        group.bench_with_input(
            BenchmarkId::new("decompile", conditions),
            &equation,
            |b, equation| b.iter(|| compiler.decompile(black_box(equation))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_evaluation,
    bench_advanced_evaluation,
    bench_table_evaluation,
    bench_equation,
);
criterion_main!(benches);
