//! 포렌식 엔진 설정
//!
//! [`EngineConfig`]는 core의 [`ForensicConfig`](kinix_core::config::ForensicConfig)를
//! 기반으로 엔진 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```
//! use kinix_core::config::KinixConfig;
//! use kinix_forensic::config::EngineConfig;
//!
//! let core_config = KinixConfig::default();
//! let config = EngineConfig::from_core(&core_config.forensic);
//! assert!(config.validate().is_ok());
//! ```

use kinix_core::types::RiskTier;
use serde::{Deserialize, Serialize};

use crate::error::ForensicError;

/// 입력 최대 크기 상한 (1 GiB)
const MAX_FILE_SIZE_LIMIT: usize = 1024 * 1024 * 1024;
/// 워커 수 상한
const MAX_WORKERS: usize = 256;

/// 포렌식 엔진 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 사용자 정의 YAML 규칙 디렉토리 (비어있으면 내장 규칙)
    pub rules_dir: String,
    /// 호출자가 읽어 들일 입력의 최대 크기 (바이트)
    pub max_file_size: usize,
    /// 배치 스캔 워커 수 (0이면 CPU 수)
    pub workers: usize,
    /// Generic 텍스트 심각도 키워드 집계
    pub keyword_census: bool,
    /// 비정상 종료로 간주할 최소 등급
    pub fail_on: RiskTier,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules_dir: String::new(),
            max_file_size: 50 * 1024 * 1024,
            workers: 0,
            keyword_census: true,
            fail_on: RiskTier::Critical,
        }
    }
}

impl EngineConfig {
    /// core의 `ForensicConfig`에서 엔진 설정을 생성합니다.
    ///
    /// 알 수 없는 `fail_on` 값은 기본값(`critical`)으로 대체됩니다.
    /// core 설정 검증을 통과한 값이라면 발생하지 않습니다.
    pub fn from_core(core: &kinix_core::config::ForensicConfig) -> Self {
        Self {
            rules_dir: core.rules_dir.clone(),
            max_file_size: core.max_file_size,
            workers: core.workers,
            keyword_census: core.keyword_census,
            fail_on: RiskTier::from_str_loose(&core.fail_on).unwrap_or(RiskTier::Critical),
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ForensicError> {
        if self.max_file_size == 0 || self.max_file_size > MAX_FILE_SIZE_LIMIT {
            return Err(ForensicError::Config {
                field: "max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE_LIMIT}"),
            });
        }

        if self.workers > MAX_WORKERS {
            return Err(ForensicError::Config {
                field: "workers".to_owned(),
                reason: format!("must be 0 (auto) or 1-{MAX_WORKERS}"),
            });
        }

        Ok(())
    }
}

/// 엔진 설정 빌더
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 규칙 디렉토리를 설정합니다.
    pub fn rules_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.rules_dir = dir.into();
        self
    }

    /// 입력 최대 크기를 설정합니다.
    pub fn max_file_size(mut self, bytes: usize) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    /// 워커 수를 설정합니다.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// 키워드 집계 여부를 설정합니다.
    pub fn keyword_census(mut self, enabled: bool) -> Self {
        self.config.keyword_census = enabled;
        self
    }

    /// 실패 기준 등급을 설정합니다.
    pub fn fail_on(mut self, tier: RiskTier) -> Self {
        self.config.fail_on = tier;
        self
    }

    /// 설정을 검증하고 `EngineConfig`를 생성합니다.
    pub fn build(self) -> Result<EngineConfig, ForensicError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
