//! 포렌식 엔진 에러 타입
//!
//! [`ForensicError`]는 엔진의 설정 경로(규칙 로딩, 엔진 구성, 리포트 복원)에서만
//! 발생합니다. 분류와 점수 산정 자체는 어떤 입력에도 실패하지 않습니다.
//! `From<ForensicError> for KinixError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use kinix_core::error::{ConfigError, ExportError, KinixError, RuleError};

/// 포렌식 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ForensicError {
    /// 규칙 파일 로딩 실패
    #[error("rule load error: {path}: {reason}")]
    RuleLoad {
        /// 규칙 파일 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 규칙 유효성 검증 실패
    #[error("rule validation error: rule '{rule_id}': {reason}")]
    RuleValidation {
        /// 문제가 된 규칙 ID
        rule_id: String,
        /// 검증 실패 사유
        reason: String,
    },

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 리포트 내보내기/복원 에러
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ForensicError> for KinixError {
    fn from(err: ForensicError) -> Self {
        match err {
            ForensicError::RuleLoad { path, reason } => {
                KinixError::Rule(RuleError::Load { path, reason })
            }
            ForensicError::RuleValidation { rule_id, reason } => {
                KinixError::Rule(RuleError::Invalid { rule_id, reason })
            }
            ForensicError::Regex(e) => KinixError::Rule(RuleError::Invalid {
                rule_id: "(unknown)".to_owned(),
                reason: e.to_string(),
            }),
            ForensicError::Config { field, reason } => {
                KinixError::Config(ConfigError::InvalidValue { field, reason })
            }
            ForensicError::Export(e) => KinixError::Export(e),
            ForensicError::Io(e) => KinixError::Io(e),
        }
    }
}
