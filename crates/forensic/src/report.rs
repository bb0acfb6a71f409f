//! 스캔 결과 -- 분석 단계의 출력을 하나의 불변 구조로 조립합니다.
//!
//! [`ScanResult`]는 생성 후 변경되지 않으며, 동기화 없이 직렬화/내보내기할 수 있습니다.
//! 영속화 계층을 위해 평면 key/value 표현([`ScanResult::to_flat`])을 제공합니다.

use std::collections::BTreeMap;
use std::fmt;

use kinix_core::error::ExportError;
use kinix_core::types::{Finding, RiskTier};
use serde::{Deserialize, Serialize};

use crate::scorer::ScoreOutcome;
use crate::types::{ByteProfile, ContentFormat};

/// 스캔 결과 (aggregate root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// 경로 또는 호출자가 지정한 식별자
    pub id: String,
    /// 바이트 프로파일 (텍스트만 스캔한 경우 없음)
    pub byte_profile: Option<ByteProfile>,
    /// 분류된 콘텐츠 형식
    pub format: ContentFormat,
    /// 관찰 항목 (순서 유지)
    pub findings: Vec<Finding>,
    /// 위험 등급
    pub tier: RiskTier,
    /// 위험 점수
    pub score: u32,
}

impl ScanResult {
    /// 평면 key/value 맵으로 변환합니다.
    ///
    /// 키: `id`, `format`, `tier`, `score`, `finding_count`,
    /// `finding.<i>.label|detail|weight`, `byte_profile.entropy|magic_ok|size_bytes`
    pub fn to_flat(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("id".to_owned(), self.id.clone());
        map.insert("format".to_owned(), self.format.as_str().to_owned());
        map.insert("tier".to_owned(), self.tier.as_str().to_owned());
        map.insert("score".to_owned(), self.score.to_string());
        map.insert("finding_count".to_owned(), self.findings.len().to_string());

        for (i, finding) in self.findings.iter().enumerate() {
            map.insert(format!("finding.{i}.label"), finding.label.clone());
            map.insert(format!("finding.{i}.detail"), finding.detail.clone());
            map.insert(format!("finding.{i}.weight"), finding.weight.to_string());
        }

        if let Some(profile) = &self.byte_profile {
            map.insert(
                "byte_profile.entropy".to_owned(),
                profile.entropy.to_string(),
            );
            map.insert(
                "byte_profile.magic_ok".to_owned(),
                profile.magic_ok.to_string(),
            );
            map.insert(
                "byte_profile.size_bytes".to_owned(),
                profile.size_bytes.to_string(),
            );
        }

        map
    }

    /// 평면 key/value 맵에서 결과를 복원합니다.
    ///
    /// # Errors
    /// - 필수 키가 없는 경우 ([`ExportError::MissingKey`])
    /// - 값을 파싱할 수 없는 경우 ([`ExportError::Malformed`])
    pub fn from_flat(map: &BTreeMap<String, String>) -> Result<Self, ExportError> {
        let id = required(map, "id")?.to_owned();

        let format_raw = required(map, "format")?;
        let format = ContentFormat::from_str_opt(format_raw)
            .ok_or_else(|| malformed("format", format!("unknown format '{format_raw}'")))?;

        let tier_raw = required(map, "tier")?;
        let tier = RiskTier::from_str_loose(tier_raw)
            .ok_or_else(|| malformed("tier", format!("unknown tier '{tier_raw}'")))?;

        let score: u32 = parse(map, "score")?;
        let count: usize = parse(map, "finding_count")?;

        let mut findings = Vec::with_capacity(count.min(1024));
        for i in 0..count {
            findings.push(Finding {
                label: required(map, &format!("finding.{i}.label"))?.to_owned(),
                detail: required(map, &format!("finding.{i}.detail"))?.to_owned(),
                weight: parse(map, &format!("finding.{i}.weight"))?,
            });
        }

        let byte_profile = if map.contains_key("byte_profile.entropy") {
            Some(ByteProfile {
                entropy: parse(map, "byte_profile.entropy")?,
                magic_ok: parse(map, "byte_profile.magic_ok")?,
                size_bytes: parse(map, "byte_profile.size_bytes")?,
            })
        } else {
            None
        };

        Ok(Self {
            id,
            byte_profile,
            format,
            findings,
            tier,
            score,
        })
    }

    /// 가중치가 있는 항목만 반환합니다.
    pub fn weighted_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_informational())
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] tier={} score={} findings={}",
            self.id,
            self.format.as_str(),
            self.tier.as_str(),
            self.score,
            self.findings.len()
        )
    }
}

fn required<'a>(map: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str, ExportError> {
    map.get(key)
        .map(String::as_str)
        .ok_or_else(|| ExportError::MissingKey(key.to_owned()))
}

fn parse<T>(map: &BTreeMap<String, String>, key: &str) -> Result<T, ExportError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    required(map, key)?
        .parse::<T>()
        .map_err(|e| malformed(key, e.to_string()))
}

fn malformed(key: &str, reason: String) -> ExportError {
    ExportError::Malformed {
        key: key.to_owned(),
        reason,
    }
}

/// 스캔 결과 빌더
///
/// 분석 단계의 출력을 모아 [`ScanResult`]를 조립합니다. 유효성 검증은 하지 않습니다.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    id: String,
    byte_profile: Option<ByteProfile>,
    format: ContentFormat,
    findings: Vec<Finding>,
    score: u32,
    tier: RiskTier,
}

impl ReportBuilder {
    /// 식별자로 빌더를 생성합니다.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// 바이트 프로파일을 설정합니다.
    pub fn byte_profile(mut self, profile: Option<ByteProfile>) -> Self {
        self.byte_profile = profile;
        self
    }

    /// 콘텐츠 형식을 설정합니다.
    pub fn format(mut self, format: ContentFormat) -> Self {
        self.format = format;
        self
    }

    /// 관찰 항목을 설정합니다.
    pub fn findings(mut self, findings: Vec<Finding>) -> Self {
        self.findings = findings;
        self
    }

    /// 점수를 설정합니다.
    pub fn score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    /// 등급을 설정합니다.
    pub fn tier(mut self, tier: RiskTier) -> Self {
        self.tier = tier;
        self
    }

    /// 점수 산정 결과(항목, 점수, 등급)를 한 번에 설정합니다.
    pub fn outcome(self, outcome: ScoreOutcome) -> Self {
        self.findings(outcome.findings)
            .score(outcome.score)
            .tier(outcome.tier)
    }

    /// 결과를 조립합니다.
    pub fn build(self) -> ScanResult {
        ScanResult {
            id: self.id,
            byte_profile: self.byte_profile,
            format: self.format,
            findings: self.findings,
            tier: self.tier,
            score: self.score,
        }
    }
}
