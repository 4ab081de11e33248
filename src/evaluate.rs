//! 批量评估：准确率、匹配延迟、匹配方式分布

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

use crate::dataset::DatasetCase;
use crate::normalize::{normalize, strip_tail_particle};
use crate::voice_commands::{MatchMode, VoiceCommandMatcher};

/// 单条用例的评估结果
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub raw: String,
    pub expected: String,
    pub normalized: String,
    pub predicted: Option<String>,
    pub mode: MatchMode,
    /// 精确 + 模糊匹配耗时，不含归一化
    pub latency: Duration,
    pub ok: bool,
}

impl CaseResult {
    pub fn latency_ms(&self) -> f64 {
        self.latency.as_nanos() as f64 / 1_000_000.0
    }
}

pub fn evaluate(matcher: &VoiceCommandMatcher, cases: &[DatasetCase]) -> Vec<CaseResult> {
    cases
        .iter()
        .map(|case| {
            let normalized = normalize(strip_tail_particle(case.input.trim()));

            let start = Instant::now();
            let result = matcher.match_normalized(normalized);
            let latency = start.elapsed();

            let ok = result.command.as_deref() == Some(case.expected.as_str());
            CaseResult {
                raw: case.input.clone(),
                expected: case.expected.clone(),
                normalized: result.normalized,
                predicted: result.command,
                mode: result.mode,
                latency,
                ok,
            }
        })
        .collect()
}

/// 汇总统计，延迟单位为毫秒
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub correct: usize,
    /// 百分比
    pub accuracy: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
    pub mode_counts: BTreeMap<MatchMode, usize>,
}

impl Summary {
    pub fn from_results(results: &[CaseResult]) -> Self {
        let total = results.len();
        let correct = results.iter().filter(|r| r.ok).count();
        let accuracy = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64 * 100.0
        };

        let mut latencies: Vec<f64> = results.iter().map(CaseResult::latency_ms).collect();
        latencies.sort_by(f64::total_cmp);
        let max_ms = latencies.last().copied().unwrap_or(0.0);

        let mut mode_counts = BTreeMap::new();
        for r in results {
            *mode_counts.entry(r.mode).or_insert(0) += 1;
        }

        Self {
            total,
            correct,
            accuracy,
            p50_ms: median(&latencies),
            p95_ms: p95(&latencies).unwrap_or(max_ms),
            max_ms,
            mode_counts,
        }
    }
}

/// 已排序数据的中位数，偶数个取中间两个的平均
fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// 20 等分 exclusive 分位数的第 19 个切点，样本少于 20 个时返回 None
fn p95(sorted: &[f64]) -> Option<f64> {
    const PARTS: usize = 20;
    const CUT: usize = 19;

    let n = sorted.len();
    if n < PARTS {
        return None;
    }
    let m = n + 1;
    let j = CUT * m / PARTS;
    let delta = (CUT * m - j * PARTS) as f64;
    Some((sorted[j - 1] * (PARTS as f64 - delta) + sorted[j] * delta) / PARTS as f64)
}

/// 生成一个测试集的文字报告，列出前 `show_failures` 个失败用例
pub fn render_report(title: &str, results: &[CaseResult], show_failures: usize) -> String {
    let summary = Summary::from_results(results);
    let mut out = String::new();

    let _ = writeln!(out, "\n=== {title} ===");
    let _ = writeln!(out, "用例总数: {}", summary.total);
    let _ = writeln!(out, "匹配正确: {}", summary.correct);
    let _ = writeln!(out, "准确率: {:.2}%", summary.accuracy);
    let _ = writeln!(
        out,
        "耗时 (ms): p50={:.3}, p95={:.3}, 最大值={:.3}",
        summary.p50_ms, summary.p95_ms, summary.max_ms
    );
    let modes: Vec<String> = summary
        .mode_counts
        .iter()
        .map(|(mode, count)| format!("{mode}={count}"))
        .collect();
    let _ = writeln!(out, "匹配模式统计: {}", modes.join(", "));

    let failures: Vec<&CaseResult> = results.iter().filter(|r| !r.ok).collect();
    if failures.is_empty() {
        let _ = writeln!(out, "\n无失败用例");
        return out;
    }

    let _ = writeln!(
        out,
        "\n前 {} 个失败用例:",
        show_failures.min(failures.len())
    );
    for r in failures.iter().take(show_failures) {
        let _ = writeln!(
            out,
            "- 原始={:?} -> 归一化={:?} | 期望={:?} | 预测={:?} | 模式={} | {:.3}ms",
            r.raw,
            r.normalized,
            r.expected,
            r.predicted,
            r.mode,
            r.latency_ms()
        );
    }
    out
}
