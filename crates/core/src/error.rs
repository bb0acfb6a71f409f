//! 에러 타입 — 도메인별 에러 정의
//!
//! 분류/점수 산정 자체는 에러를 만들지 않습니다. 여기 정의된 에러는
//! 설정 로딩, 시그니처 규칙 로딩, 리포트 내보내기 같은 주변 경로에서만 발생합니다.

/// Kinix 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum KinixError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 시그니처 규칙 에러
    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    /// 리포트 내보내기/복원 에러
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 시그니처 규칙 에러
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// 규칙 파일 로딩 실패
    #[error("failed to load rules from {path}: {reason}")]
    Load { path: String, reason: String },

    /// 규칙 유효성 검증 실패
    #[error("invalid rule '{rule_id}': {reason}")]
    Invalid { rule_id: String, reason: String },
}

/// 리포트 내보내기/복원 에러
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// 직렬화 실패
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// 평면 key/value 형식의 필수 키 누락
    #[error("missing key '{0}'")]
    MissingKey(String),

    /// 평면 key/value 형식의 값 파싱 실패
    #[error("malformed value for '{key}': {reason}")]
    Malformed { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_kinix_error() {
        let err: KinixError = ConfigError::InvalidValue {
            field: "general.log_level".to_owned(),
            reason: "must be one of: info".to_owned(),
        }
        .into();
        assert!(matches!(err, KinixError::Config(_)));
        assert!(err.to_string().contains("general.log_level"));
    }

    #[test]
    fn export_error_display_names_key() {
        let err = ExportError::MissingKey("tier".to_owned());
        assert_eq!(err.to_string(), "missing key 'tier'");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: KinixError = io.into();
        assert!(matches!(err, KinixError::Io(_)));
    }
}
