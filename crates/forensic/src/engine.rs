//! 포렌식 엔진 -- 분석 단계 오케스트레이션
//!
//! [`ForensicEngine`]은 바이트 분석, 형식 분류, 위험도 산정, 결과 조립을
//! 하나의 스캔 호출로 묶습니다. 구성 후에는 불변이며 스캔 간 상태를 공유하지 않으므로
//! 여러 스레드에서 동시에 호출할 수 있습니다.
//!
//! # 흐름
//! ```text
//! bytes --> ByteAnalyzer --(text)--> FormatClassifier --> RiskScorer --> ReportBuilder
//!                        \-(binary)-> document rules ----------------/
//! ```

use std::path::Path;
use std::time::Instant;

use kinix_core::metrics as m;
use kinix_core::types::{Finding, RiskTier};
use rayon::prelude::*;

use crate::bytes::entropy::ENTROPY_PACKED_MIN;
use crate::bytes::{ByteAnalyzer, MagicTable, looks_like_text};
use crate::classifier::FormatClassifier;
use crate::config::EngineConfig;
use crate::error::ForensicError;
use crate::report::{ReportBuilder, ScanResult};
use crate::scorer::{RiskScorer, ScoreOutcome, generic};
use crate::signature::{RuleLoader, SignatureEngine, SignatureRule, default_rules};
use crate::types::{ByteProfile, ContentFormat};

/// 매직 바이트 불일치 항목의 가중치
pub const MAGIC_MISMATCH_WEIGHT: u32 = 20;

/// 배치 스캔 입력
#[derive(Debug, Clone)]
pub enum ScanInput {
    /// 이미 디코딩된 텍스트
    Text {
        /// 식별자
        id: String,
        /// 내용
        text: String,
    },
    /// 원시 바이트와 주장된 확장자
    Bytes {
        /// 식별자
        id: String,
        /// 내용
        bytes: Vec<u8>,
        /// 주장된 확장자 (예: `.pdf`)
        extension: String,
    },
}

impl ScanInput {
    /// 파일 경로와 내용으로 바이트 입력을 만듭니다. 확장자는 경로에서 추출합니다.
    pub fn from_file(path: &Path, bytes: Vec<u8>) -> Self {
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        Self::Bytes {
            id: path.display().to_string(),
            bytes,
            extension,
        }
    }

    /// 입력 식별자
    pub fn id(&self) -> &str {
        match self {
            Self::Text { id, .. } | Self::Bytes { id, .. } => id,
        }
    }
}

/// 포렌식 엔진
pub struct ForensicEngine {
    config: EngineConfig,
    analyzer: ByteAnalyzer,
    classifier: FormatClassifier,
    scorer: RiskScorer,
    documents: SignatureEngine,
    pool: rayon::ThreadPool,
}

impl ForensicEngine {
    /// 설정으로 엔진을 구성합니다.
    ///
    /// `rules_dir`이 지정되어 있으면 디렉토리의 YAML 규칙을, 아니면 내장 규칙을 사용합니다.
    pub async fn from_config(config: EngineConfig) -> Result<Self, ForensicError> {
        let mut builder = ForensicEngineBuilder::new();
        if !config.rules_dir.is_empty() {
            let rules = RuleLoader::load_directory(&config.rules_dir).await?;
            builder = builder.rules(rules);
        }
        builder.config(config).build()
    }

    /// 텍스트를 스캔합니다. 바이트 프로파일은 없습니다.
    pub fn scan_text(&self, id: &str, text: &str) -> ScanResult {
        let started = Instant::now();
        let format = self.classifier.classify(text);
        let outcome = self.scorer.score(format, text);
        let result = ReportBuilder::new(id)
            .format(format)
            .outcome(outcome)
            .build();
        self.record(&result, started);
        result
    }

    /// 원시 바이트를 스캔합니다.
    ///
    /// 텍스트로 보이면 분류/점수화하고, 아니면 문서 매크로 규칙을 적용합니다.
    /// 매직 바이트 불일치와 높은 엔트로피는 추가 항목으로 기록됩니다.
    pub fn scan_bytes(&self, id: &str, bytes: &[u8], claimed_extension: &str) -> ScanResult {
        let started = Instant::now();
        let profile = self.analyzer.profile(bytes, claimed_extension);
        let content = String::from_utf8_lossy(bytes);

        let (format, mut findings, text_tier) = if looks_like_text(bytes) {
            let format = self.classifier.classify(&content);
            let outcome = self.scorer.score(format, &content);
            (format, outcome.findings, outcome.tier)
        } else {
            let findings = generic::signature_findings(&self.documents, &content);
            (ContentFormat::Generic, findings, RiskTier::Safe)
        };

        append_profile_findings(&mut findings, &profile, claimed_extension);

        let mut outcome = ScoreOutcome::new(findings, text_tier);
        // Generic은 매직 불일치까지 포함한 최종 점수로 등급을 정합니다.
        if format == ContentFormat::Generic {
            outcome.tier = RiskTier::from_score(outcome.score);
        } else if !profile.magic_ok {
            outcome.tier = outcome.tier.max(RiskTier::Medium);
        }

        let result = ReportBuilder::new(id)
            .byte_profile(Some(profile))
            .format(format)
            .outcome(outcome)
            .build();
        self.record(&result, started);
        result
    }

    /// 단일 입력을 스캔합니다.
    pub fn scan(&self, input: &ScanInput) -> ScanResult {
        match input {
            ScanInput::Text { id, text } => self.scan_text(id, text),
            ScanInput::Bytes {
                id,
                bytes,
                extension,
            } => self.scan_bytes(id, bytes, extension),
        }
    }

    /// 여러 입력을 워커 풀에서 병렬로 스캔합니다. 결과는 입력 순서를 유지합니다.
    pub fn scan_batch(&self, inputs: &[ScanInput]) -> Vec<ScanResult> {
        tracing::debug!(
            count = inputs.len(),
            workers = self.pool.current_num_threads(),
            "starting batch scan"
        );
        self.pool
            .install(|| inputs.par_iter().map(|input| self.scan(input)).collect())
    }

    /// 결과가 실패 기준 등급 이상인지 확인합니다.
    pub fn exceeds_threshold(&self, result: &ScanResult) -> bool {
        result.tier >= self.config.fail_on
    }

    /// 엔진 설정
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 텍스트 시그니처 엔진
    pub fn signatures(&self) -> &SignatureEngine {
        self.scorer.signatures()
    }

    fn record(&self, result: &ScanResult, started: Instant) {
        let matches = result
            .findings
            .iter()
            .filter(|f| {
                self.signatures().rules().iter().any(|r| r.name == f.label)
                    || self.documents.rules().iter().any(|r| r.name == f.label)
            })
            .count();

        metrics::counter!(m::FORENSIC_SCANS_TOTAL, m::LABEL_FORMAT => result.format.as_str())
            .increment(1);
        metrics::counter!(m::FORENSIC_SIGNATURE_MATCHES_TOTAL).increment(matches as u64);
        metrics::counter!(m::FORENSIC_FINDINGS_TOTAL).increment(result.findings.len() as u64);
        metrics::counter!(m::FORENSIC_TIER_TOTAL, m::LABEL_TIER => result.tier.as_str())
            .increment(1);
        metrics::histogram!(m::FORENSIC_SCAN_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());

        tracing::debug!(
            id = %result.id,
            format = %result.format.as_str(),
            tier = %result.tier.as_str(),
            score = result.score,
            findings = result.findings.len(),
            "scan complete"
        );
    }
}

impl std::fmt::Debug for ForensicEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForensicEngine")
            .field("config", &self.config)
            .field("signatures", &self.signatures().rule_count())
            .field("document_rules", &self.documents.rule_count())
            .field("workers", &self.pool.current_num_threads())
            .finish()
    }
}

/// 매직 바이트 불일치, 높은 엔트로피 항목을 덧붙입니다.
fn append_profile_findings(findings: &mut Vec<Finding>, profile: &ByteProfile, extension: &str) {
    if !profile.magic_ok {
        findings.push(Finding::new(
            "Magic Mismatch",
            format!("leading bytes do not match the '{extension}' signature"),
            MAGIC_MISMATCH_WEIGHT,
        ));
    }
    if profile.entropy > ENTROPY_PACKED_MIN {
        findings.push(Finding::info(
            "High Entropy",
            format!("{:.2} bits/byte, likely packed or encrypted", profile.entropy),
        ));
    }
}

/// 엔진 빌더
#[derive(Default)]
pub struct ForensicEngineBuilder {
    config: EngineConfig,
    rules: Option<Vec<SignatureRule>>,
    document_rules: Option<Vec<SignatureRule>>,
    magic: Option<MagicTable>,
    classifier: Option<FormatClassifier>,
}

impl ForensicEngineBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 엔진 설정을 지정합니다.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// 텍스트 시그니처 규칙을 교체합니다.
    pub fn rules(mut self, rules: Vec<SignatureRule>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// 문서 매크로 규칙을 교체합니다.
    pub fn document_rules(mut self, rules: Vec<SignatureRule>) -> Self {
        self.document_rules = Some(rules);
        self
    }

    /// 매직 바이트 테이블을 교체합니다.
    pub fn magic_table(mut self, table: MagicTable) -> Self {
        self.magic = Some(table);
        self
    }

    /// 형식 분류기를 교체합니다.
    pub fn classifier(mut self, classifier: FormatClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// 설정을 검증하고 엔진을 생성합니다.
    pub fn build(self) -> Result<ForensicEngine, ForensicError> {
        self.config.validate()?;

        let signatures = match self.rules {
            Some(rules) => SignatureEngine::new(rules)?,
            None => SignatureEngine::new(default_rules())?,
        };
        let documents = match self.document_rules {
            Some(rules) => SignatureEngine::new(rules)?,
            None => SignatureEngine::with_document_rules(),
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .thread_name(|i| format!("kinix-scan-{i}"))
            .build()
            .map_err(|e| ForensicError::Config {
                field: "workers".to_owned(),
                reason: format!("failed to build worker pool: {e}"),
            })?;

        tracing::info!(
            rules = signatures.rule_count(),
            enabled = signatures.enabled_count(),
            document_rules = documents.rule_count(),
            workers = pool.current_num_threads(),
            "forensic engine initialized"
        );

        Ok(ForensicEngine {
            scorer: RiskScorer::new(signatures).with_keyword_census(self.config.keyword_census),
            analyzer: ByteAnalyzer::new(self.magic.unwrap_or_default()),
            classifier: self.classifier.unwrap_or_default(),
            documents,
            pool,
            config: self.config,
        })
    }
}
