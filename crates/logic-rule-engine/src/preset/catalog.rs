//! 内置量表标签目录
//!
//! 标签按从低到高排列，因此编码 n 始终是最高档。

use super::models::ScaleFamily;

const NUMERIC_10: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"];

const AGREEMENT_3: [&str; 3] = ["Disagree", "Neither", "Agree"];
const AGREEMENT_5: [&str; 5] = [
    "Strongly disagree",
    "Disagree",
    "Neither",
    "Agree",
    "Strongly agree",
];
const AGREEMENT_7: [&str; 7] = [
    "Strongly disagree",
    "Disagree",
    "Somewhat disagree",
    "Neither",
    "Somewhat agree",
    "Agree",
    "Strongly agree",
];

const APPLICABILITY_3: [&str; 3] = [
    "Not applicable",
    "Somewhat applicable",
    "Fully applicable",
];
const APPLICABILITY_5: [&str; 5] = [
    "Not at all applicable",
    "Slightly applicable",
    "Moderately applicable",
    "Very applicable",
    "Extremely applicable",
];
const APPLICABILITY_7: [&str; 7] = [
    "Not at all",
    "Slightly",
    "Somewhat",
    "Moderately",
    "Very",
    "Highly",
    "Extremely",
];

const CONSIDERATION_3: [&str; 3] = ["Would not consider", "Might consider", "Would consider"];
const CONSIDERATION_5: [&str; 5] = [
    "Definitely would not",
    "Probably would not",
    "Might or might not",
    "Probably would",
    "Definitely would",
];
const CONSIDERATION_7: [&str; 7] = [
    "Definitely not",
    "Probably not",
    "Somewhat not",
    "Unsure",
    "Somewhat would",
    "Probably would",
    "Definitely would",
];

const LIKELIHOOD_3: [&str; 3] = ["Unlikely", "Neither", "Likely"];
const LIKELIHOOD_5: [&str; 5] = [
    "Very unlikely",
    "Unlikely",
    "Neither",
    "Likely",
    "Very likely",
];
const LIKELIHOOD_7: [&str; 7] = [
    "Extremely unlikely",
    "Very unlikely",
    "Unlikely",
    "Neither",
    "Likely",
    "Very likely",
    "Extremely likely",
];
const LIKELIHOOD_10: [&str; 10] = [
    "Not at all likely",
    "2",
    "3",
    "4",
    "5",
    "6",
    "7",
    "8",
    "9",
    "Extremely likely",
];

const SATISFACTION_3: [&str; 3] = ["Dissatisfied", "Neutral", "Satisfied"];
const SATISFACTION_5: [&str; 5] = [
    "Very dissatisfied",
    "Dissatisfied",
    "Neutral",
    "Satisfied",
    "Very satisfied",
];
const SATISFACTION_7: [&str; 7] = [
    "Extremely dissatisfied",
    "Very dissatisfied",
    "Dissatisfied",
    "Neutral",
    "Satisfied",
    "Very satisfied",
    "Extremely satisfied",
];

/// 内置标签；点数不受支持时返回 `None`
pub fn builtin_labels(family: ScaleFamily, points: usize) -> Option<&'static [&'static str]> {
    use ScaleFamily::*;

    let labels: &'static [&'static str] = match (family, points) {
        (Agreement, 3) => &AGREEMENT_3,
        (Agreement, 5) => &AGREEMENT_5,
        (Agreement, 7) => &AGREEMENT_7,
        (Applicability, 3) => &APPLICABILITY_3,
        (Applicability, 5) => &APPLICABILITY_5,
        (Applicability, 7) => &APPLICABILITY_7,
        (Consideration, 3) => &CONSIDERATION_3,
        (Consideration, 5) => &CONSIDERATION_5,
        (Consideration, 7) => &CONSIDERATION_7,
        (Likelihood, 3) => &LIKELIHOOD_3,
        (Likelihood, 5) => &LIKELIHOOD_5,
        (Likelihood, 7) => &LIKELIHOOD_7,
        (Likelihood, 10) => &LIKELIHOOD_10,
        (Satisfaction, 3) => &SATISFACTION_3,
        (Satisfaction, 5) => &SATISFACTION_5,
        (Satisfaction, 7) => &SATISFACTION_7,
        (_, 10) => &NUMERIC_10,
        _ => return None,
    };
    Some(labels)
}

/// 根据列标签识别内置语义族
///
/// 标签需与某个内置预设逐项一致（忽略大小写和首尾空白）。
/// 多个语义族共用同一组标签时（如纯数字 10 点量表）无法判断，返回 `None`。
pub fn detect_family(cols: &[String]) -> Option<ScaleFamily> {
    let mut matches = ScaleFamily::ALL.into_iter().filter(|family| {
        builtin_labels(*family, cols.len()).is_some_and(|labels| {
            labels
                .iter()
                .zip(cols)
                .all(|(label, col)| label.eq_ignore_ascii_case(col.trim()))
        })
    });

    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}
