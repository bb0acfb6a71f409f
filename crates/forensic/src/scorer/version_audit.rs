//! 버전 감사 리포트 추출기
//!
//! ```text
//! REPORTE DE VERSIONES - 2024-05-01 10:00:00
//! PAQUETE                        LOCAL           LATEST          ESTADO
//! requests                       2.28.0          2.31.0          OUTDATED
//! numpy                          1.26.4          1.26.4          OK
//! ```
//!
//! 이 형식은 `Medium`을 넘지 않습니다.

use kinix_core::types::{Finding, RiskTier};
use semver::Version;

use super::ScoreOutcome;

/// 오래된 패키지 하나당 가중치
const OUTDATED_WEIGHT: u32 = 10;

/// 오래된 행을 나타내는 마지막 토큰
const OUTDATED_MARKERS: &[&str] = &["OUTDATED", "DESACTUALIZADO"];

/// 버전 차이의 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl BumpKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }
}

/// 버전 감사 텍스트를 점수화합니다.
pub fn score(text: &str) -> ScoreOutcome {
    let mut findings = Vec::new();
    let mut audited = 0usize;
    let mut outdated = 0usize;

    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(last) = tokens.last() else {
            continue;
        };

        if last.eq_ignore_ascii_case("OK") {
            audited += 1;
            continue;
        }

        if !OUTDATED_MARKERS.iter().any(|m| last.eq_ignore_ascii_case(m)) {
            continue;
        }

        audited += 1;
        outdated += 1;
        findings.push(Finding::new(
            "Outdated Package",
            outdated_detail(&tokens[..tokens.len() - 1]),
            OUTDATED_WEIGHT,
        ));
    }

    if audited > 0 {
        findings.push(Finding::info(
            "Packages Audited",
            format!("{audited} package(s) audited, {outdated} outdated"),
        ));
    }

    let tier = if outdated > 0 {
        RiskTier::Medium
    } else {
        RiskTier::Safe
    };

    ScoreOutcome::new(findings, tier)
}

/// `name local latest` 토큰에서 상세 설명을 만듭니다.
fn outdated_detail(columns: &[&str]) -> String {
    match columns {
        [name, local, latest, ..] => {
            let mut detail = format!("{name} {local} -> {latest}");
            if let Some(kind) = bump_kind(local, latest) {
                detail.push_str(&format!(" ({})", kind.as_str()));
            }
            detail
        }
        [name, ..] => (*name).to_owned(),
        [] => "(unnamed)".to_owned(),
    }
}

/// 두 버전 사이의 업데이트 단계를 판별합니다.
///
/// 둘 중 하나라도 파싱되지 않거나 최신 버전이 더 높지 않으면 `None`입니다.
pub fn bump_kind(local: &str, latest: &str) -> Option<BumpKind> {
    let local = parse_lenient(local)?;
    let latest = parse_lenient(latest)?;
    if latest <= local {
        return None;
    }
    Some(if latest.major != local.major {
        BumpKind::Major
    } else if latest.minor != local.minor {
        BumpKind::Minor
    } else {
        BumpKind::Patch
    })
}

/// `v1.2`, `1.2` 같은 축약 표기를 `1.2.0`으로 보정하여 파싱합니다.
fn parse_lenient(raw: &str) -> Option<Version> {
    let raw = raw.trim().trim_start_matches(['v', 'V']);
    if let Ok(version) = Version::parse(raw) {
        return Some(version);
    }
    let parts = raw.split('.').count();
    let padded = match parts {
        1 => format!("{raw}.0.0"),
        2 => format!("{raw}.0"),
        _ => return None,
    };
    Version::parse(&padded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
REPORTE DE VERSIONES - 2024-05-01 10:00:00
------------------------------------------------------------
PAQUETE                        LOCAL           LATEST          ESTADO
------------------------------------------------------------
requests                       2.28.0          2.31.0          OUTDATED
numpy                          1.26.4          1.26.4          OK
django                         3.2             4.2.1           OUTDATED
legacy-tool                    unknown         N/A             desactualizado
";

    #[test]
    fn outdated_rows_become_findings() {
        let outcome = score(SAMPLE);
        let outdated: Vec<_> = outcome
            .findings
            .iter()
            .filter(|f| f.label == "Outdated Package")
            .map(|f| f.detail.as_str())
            .collect();
        assert_eq!(
            outdated,
            [
                "requests 2.28.0 -> 2.31.0 (minor)",
                "django 3.2 -> 4.2.1 (major)",
                "legacy-tool unknown -> N/A",
            ]
        );
        assert_eq!(outcome.score, 30);
        assert_eq!(outcome.tier, RiskTier::Medium);
    }

    #[test]
    fn audited_count_is_informational() {
        let outcome = score(SAMPLE);
        let audited = outcome.findings.last().unwrap();
        assert_eq!(audited.label, "Packages Audited");
        assert_eq!(audited.detail, "4 package(s) audited, 3 outdated");
        assert!(audited.is_informational());
    }

    #[test]
    fn tier_never_exceeds_medium() {
        let rows: String = (0..50)
            .map(|i| format!("pkg{i} 1.0.0 2.0.0 OUTDATED\n"))
            .collect();
        let outcome = score(&format!("VERSION REPORT\n{rows}"));
        assert_eq!(outcome.tier, RiskTier::Medium);
        assert_eq!(outcome.score, 500);
    }

    #[test]
    fn all_ok_is_safe() {
        let outcome = score("VERSION REPORT\nserde 1.0.0 1.0.0 OK\n");
        assert_eq!(outcome.tier, RiskTier::Safe);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn bump_kinds() {
        assert_eq!(bump_kind("1.2.3", "1.2.4"), Some(BumpKind::Patch));
        assert_eq!(bump_kind("v1.2", "1.3"), Some(BumpKind::Minor));
        assert_eq!(bump_kind("1", "2"), Some(BumpKind::Major));
        assert_eq!(bump_kind("2.0.0", "1.0.0"), None);
        assert_eq!(bump_kind("abc", "1.0.0"), None);
    }
}
