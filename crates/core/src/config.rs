//! 설정 관리 — kinix.toml 파싱 및 런타임 설정
//!
//! [`KinixConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`KINIX_FORENSIC_WORKERS=4` 형식)
//! 3. 설정 파일 (`kinix.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), kinix_core::error::KinixError> {
//! use kinix_core::config::KinixConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = KinixConfig::load("kinix.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = KinixConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, KinixError};
use crate::types::RiskTier;

/// 입력 파일 최대 크기 상한 (1 GiB)
const MAX_FILE_SIZE_LIMIT: usize = 1024 * 1024 * 1024;

/// 배치 워커 수 상한
const MAX_WORKERS: usize = 256;

/// Kinix 통합 설정
///
/// `kinix.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KinixConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 포렌식 엔진 설정
    #[serde(default)]
    pub forensic: ForensicConfig,
}

impl KinixConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, KinixError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, KinixError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                KinixError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                KinixError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, KinixError> {
        toml::from_str(toml_str).map_err(|e| {
            KinixError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `KINIX_{SECTION}_{FIELD}`
    /// 예: `KINIX_GENERAL_LOG_LEVEL=debug`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "KINIX_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "KINIX_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.report_dir, "KINIX_GENERAL_REPORT_DIR");

        // Forensic
        override_string(&mut self.forensic.rules_dir, "KINIX_FORENSIC_RULES_DIR");
        override_usize(
            &mut self.forensic.max_file_size,
            "KINIX_FORENSIC_MAX_FILE_SIZE",
        );
        override_usize(&mut self.forensic.workers, "KINIX_FORENSIC_WORKERS");
        override_bool(
            &mut self.forensic.keyword_census,
            "KINIX_FORENSIC_KEYWORD_CENSUS",
        );
        override_string(&mut self.forensic.fail_on, "KINIX_FORENSIC_FAIL_ON");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), KinixError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.forensic.max_file_size == 0 || self.forensic.max_file_size > MAX_FILE_SIZE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "forensic.max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE_LIMIT}"),
            }
            .into());
        }

        if self.forensic.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidValue {
                field: "forensic.workers".to_owned(),
                reason: format!("must be 0 (auto) or 1-{MAX_WORKERS}"),
            }
            .into());
        }

        if RiskTier::from_str_loose(&self.forensic.fail_on).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "forensic.fail_on".to_owned(),
                reason: "must be one of: safe, low, medium, critical".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// 리포트 저장 디렉토리
    pub report_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
            report_dir: "logs/kinix".to_owned(),
        }
    }
}

/// 포렌식 엔진 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForensicConfig {
    /// 사용자 정의 YAML 시그니처 규칙 디렉토리 (비어있으면 내장 규칙)
    pub rules_dir: String,
    /// 입력 파일 최대 크기 (바이트)
    pub max_file_size: usize,
    /// 배치 스캔 워커 수 (0이면 CPU 수)
    pub workers: usize,
    /// Generic 텍스트에서 심각도 키워드 집계 여부
    pub keyword_census: bool,
    /// 비정상 종료로 간주할 최소 등급
    pub fail_on: String,
}

impl Default for ForensicConfig {
    fn default() -> Self {
        Self {
            rules_dir: String::new(),
            max_file_size: 50 * 1024 * 1024, // 50MB
            workers: 0,
            keyword_census: true,
            fail_on: "critical".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
