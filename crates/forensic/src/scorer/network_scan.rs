//! 네트워크 탐색 CSV 추출기
//!
//! 호스트 열거 결과는 위협 신호가 아니므로 항상 `Safe`, 점수 0입니다.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use kinix_core::types::{Finding, RiskTier};

use super::ScoreOutcome;
use crate::classifier::is_network_csv_header;

/// 네트워크 탐색 CSV를 요약합니다.
pub fn score(text: &str) -> ScoreOutcome {
    let mut lines = text.lines();
    if !lines.by_ref().any(is_network_csv_header) {
        return ScoreOutcome::new(Vec::new(), RiskTier::Safe);
    }

    let mut hosts = HashSet::new();
    let mut vendors: Vec<String> = Vec::new();

    for line in lines {
        let mut columns = line.splitn(3, ',').map(str::trim);
        let ip = columns.next().and_then(|c| c.parse::<Ipv4Addr>().ok());
        let Some(ip) = ip else {
            continue;
        };
        hosts.insert(ip);

        let vendor = columns.nth(1).unwrap_or_default();
        if !vendor.is_empty() && !vendors.iter().any(|v| v == vendor) {
            vendors.push(vendor.to_owned());
        }
    }

    let mut findings = vec![Finding::info("Hosts Discovered", host_phrase(hosts.len()))];
    if !vendors.is_empty() {
        findings.push(Finding::info("Vendors", vendors.join(", ")));
    }

    ScoreOutcome::new(findings, RiskTier::Safe)
}

fn host_phrase(count: usize) -> String {
    if count == 1 {
        "1 host".to_owned()
    } else {
        format!("{count} hosts")
    }
}
