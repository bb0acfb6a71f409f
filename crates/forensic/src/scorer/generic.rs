//! 일반 텍스트 추출기 -- 시그니처 매칭과 정보성 집계
//!
//! 매칭된 규칙 하나당 20점이며 등급은 점수 임계값으로 결정됩니다.

use std::collections::HashSet;
use std::sync::LazyLock;

use kinix_core::types::{Finding, RiskTier};
use regex::Regex;

use super::ScoreOutcome;
use crate::signature::{Haystack, SignatureEngine};

/// 매칭된 시그니처 하나당 가중치
pub const SIGNATURE_WEIGHT: u32 = 20;

/// 집계할 심각도 키워드 (보고 순서)
pub const SEVERITY_KEYWORDS: &[&str] = &[
    "CRITICAL", "FATAL", "PANIC", "ERROR", "FAIL", "DENIED", "WARNING", "TIMEOUT",
];

static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("ipv4 regex is valid")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email regex is valid")
});

/// 일반 텍스트를 점수화합니다.
pub fn score(signatures: &SignatureEngine, text: &str, keyword_census: bool) -> ScoreOutcome {
    let mut findings = signature_findings(signatures, text);

    let ips = distinct(&IPV4_RE, text);
    if ips > 0 {
        findings.push(Finding::info(
            "IP Addresses",
            format!("{ips} unique IPv4 address(es)"),
        ));
    }

    let emails = distinct(&EMAIL_RE, text);
    if emails > 0 {
        findings.push(Finding::info(
            "Email Addresses",
            format!("{emails} unique email address(es)"),
        ));
    }

    if keyword_census {
        if let Some(census) = keyword_census_detail(text) {
            findings.push(Finding::info("Severity Keywords", census));
        }
    }

    let outcome = ScoreOutcome::new(findings, RiskTier::Safe);
    let tier = RiskTier::from_score(outcome.score);
    ScoreOutcome { tier, ..outcome }
}

/// 매칭된 규칙마다 가중치 20의 항목을 만듭니다 (같은 이름은 한 번).
pub(crate) fn signature_findings(signatures: &SignatureEngine, text: &str) -> Vec<Finding> {
    let haystack = Haystack::new(text);
    let mut findings: Vec<Finding> = Vec::new();
    for rule in signatures.matched_rules(&haystack) {
        if findings.iter().any(|f| f.label == rule.name) {
            continue;
        }
        let detail = if rule.description.is_empty() {
            "signature matched".to_owned()
        } else {
            rule.description.clone()
        };
        findings.push(Finding::new(rule.name.clone(), detail, SIGNATURE_WEIGHT));
    }
    findings
}

fn distinct(re: &Regex, text: &str) -> usize {
    re.find_iter(text)
        .map(|m| m.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// 대문자 텍스트에서 키워드 출현 횟수를 집계합니다 (`ERROR x3, WARNING x1`).
fn keyword_census_detail(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    let parts: Vec<String> = SEVERITY_KEYWORDS
        .iter()
        .filter_map(|kw| {
            let count = upper.matches(kw).count();
            (count > 0).then(|| format!("{kw} x{count}"))
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}
