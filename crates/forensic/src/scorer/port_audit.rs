//! 포트 감사 결과 추출기
//!
//! ```text
//! TARGET: 192.168.1.10
//! | PORT    | SERVICE | STATE | RISK     |
//! | 22/tcp  | ssh     | open  | OK       |
//! | 3389    | rdp     | open  | CRITICAL |
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use kinix_core::types::{Finding, RiskTier};
use regex::Regex;

use super::ScoreOutcome;

/// 위험 테이블에 있는 포트의 가중치
const KNOWN_PORT_WEIGHT: u32 = 10;
/// 위험 테이블에 없는 포트의 가중치
const OTHER_PORT_WEIGHT: u32 = 5;
/// `CRITICAL`/`ALERT` 표시 행 하나당 가중치
const FLAGGED_ROW_WEIGHT: u32 = 20;

static TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*target:\s*(\S+)").expect("target regex is valid")
});

static PORT_CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,5})(?:/tcp|/udp)?$").expect("port cell regex is valid")
});

/// 잘 알려진 포트 -> (서비스, 위험 설명)
const PORT_RISKS: &[(u16, &str, &str)] = &[
    (21, "FTP", "cleartext credentials"),
    (22, "SSH", "brute-force target"),
    (23, "Telnet", "insecure cleartext protocol"),
    (25, "SMTP", "open relay abuse"),
    (53, "DNS", "amplification vector"),
    (80, "HTTP", "unencrypted web traffic"),
    (110, "POP3", "cleartext credentials"),
    (135, "MSRPC", "remote exploitation surface"),
    (139, "NetBIOS", "information disclosure"),
    (143, "IMAP", "cleartext credentials"),
    (445, "SMB", "ransomware vector"),
    (1433, "MSSQL", "database exposed to network"),
    (3306, "MySQL", "database exposed to network"),
    (3389, "RDP", "brute-force target"),
    (5900, "VNC", "remote control exposure"),
    (8080, "HTTP-alt", "proxy or admin panel exposure"),
];

/// 포트의 (서비스, 위험 설명)을 조회합니다.
pub fn port_risk(port: u16) -> Option<(&'static str, &'static str)> {
    PORT_RISKS
        .iter()
        .find(|(p, _, _)| *p == port)
        .map(|(_, service, risk)| (*service, *risk))
}

/// 포트 감사 텍스트를 점수화합니다.
pub fn score(text: &str) -> ScoreOutcome {
    let mut findings = Vec::new();

    if let Some(target) = TARGET_RE.captures(text).and_then(|c| c.get(1)) {
        findings.push(Finding::info("Target", target.as_str()));
    }

    let mut seen = HashSet::new();
    let mut ports = Vec::new();
    let mut flagged_rows = 0u32;

    for line in text.lines().filter(|l| l.contains('|')) {
        let upper = line.to_uppercase();
        if upper.contains("CRITICAL") || upper.contains("ALERT") {
            flagged_rows += 1;
        }

        for cell in line.split('|').map(str::trim) {
            if let Some(port) = parse_port_cell(cell) {
                if seen.insert(port) {
                    ports.push(port);
                }
            }
        }
    }

    for &port in &ports {
        let finding = match port_risk(port) {
            Some((service, risk)) => {
                Finding::new(format!("Port {port}"), format!("{service}: {risk}"), KNOWN_PORT_WEIGHT)
            }
            None => Finding::new(
                format!("Port {port}"),
                "Unknown: unclassified service",
                OTHER_PORT_WEIGHT,
            ),
        };
        findings.push(finding);
    }

    if flagged_rows > 0 {
        findings.push(Finding::new(
            "Flagged Rows",
            format!("{flagged_rows} row(s) marked CRITICAL or ALERT"),
            FLAGGED_ROW_WEIGHT.saturating_mul(flagged_rows),
        ));
    }

    let tier = if flagged_rows > 0 {
        RiskTier::Critical
    } else if !ports.is_empty() {
        RiskTier::Medium
    } else {
        RiskTier::Safe
    };

    ScoreOutcome::new(findings, tier)
}

/// 테이블 셀이 유효한 포트 번호(1-65535)인지 확인합니다.
fn parse_port_cell(cell: &str) -> Option<u16> {
    let digits = PORT_CELL_RE.captures(cell)?.get(1)?.as_str();
    match digits.parse::<u16>() {
        Ok(port) if port > 0 => Some(port),
        _ => None,
    }
}
