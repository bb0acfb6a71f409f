//! 자원 모니터 리포트 추출기
//!
//! ```text
//! === REPORTE SYSCARE ===
//! cpu_percent: 96.0
//! ram_percent: 40.0
//! disk_percent: 71.3
//! ```

use std::sync::LazyLock;

use kinix_core::types::{Finding, RiskTier};
use regex::Regex;

use super::ScoreOutcome;

/// 임계 상태 지표의 가중치
const CRITICAL_WEIGHT: u32 = 20;
/// 경고 상태 지표의 가중치
const WARNING_WEIGHT: u32 = 10;

static METRIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(cpu|ram|disk)(?:_percent)?\s*[:=]\s*([0-9]+(?:\.[0-9]+)?)\s*%?\s*$")
        .expect("resource metric regex is valid")
});

/// 측정 지표
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    Cpu,
    Ram,
    Disk,
}

impl Metric {
    fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "cpu" => Some(Self::Cpu),
            "ram" => Some(Self::Ram),
            "disk" => Some(Self::Disk),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU Usage",
            Self::Ram => "RAM Usage",
            Self::Disk => "Disk Usage",
        }
    }

    /// (경고 임계값, 위험 임계값) -- 둘 다 초과 비교
    fn thresholds(&self) -> (f64, f64) {
        match self {
            Self::Cpu => (70.0, 90.0),
            Self::Ram => (80.0, 90.0),
            Self::Disk => (85.0, 95.0),
        }
    }

    fn level(&self, value: f64) -> RiskTier {
        let (warning, critical) = self.thresholds();
        if value > critical {
            RiskTier::Critical
        } else if value > warning {
            RiskTier::Medium
        } else {
            RiskTier::Safe
        }
    }
}

/// 자원 모니터 텍스트를 점수화합니다.
///
/// 지표마다 처음 나타난 값만 사용합니다.
pub fn score(text: &str) -> ScoreOutcome {
    let mut readings: Vec<(Metric, f64)> = Vec::new();

    for caps in METRIC_RE.captures_iter(text) {
        let Some(metric) = caps.get(1).and_then(|m| Metric::from_key(m.as_str())) else {
            continue;
        };
        let Some(value) = caps.get(2).and_then(|v| v.as_str().parse::<f64>().ok()) else {
            continue;
        };
        if !readings.iter().any(|(m, _)| *m == metric) {
            readings.push((metric, value));
        }
    }

    let mut tier = RiskTier::Safe;
    let findings = readings
        .into_iter()
        .map(|(metric, value)| {
            let level = metric.level(value);
            tier = tier.max(level);
            let (state, weight) = match level {
                RiskTier::Critical => ("critical", CRITICAL_WEIGHT),
                RiskTier::Medium => ("warning", WARNING_WEIGHT),
                _ => ("normal", 0),
            };
            Finding::new(metric.label(), format!("{value:.1}% ({state})"), weight)
        })
        .collect();

    ScoreOutcome::new(findings, tier)
}
