#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`bytes`]: Shannon 엔트로피, 매직 바이트 검증, 텍스트 판별
//! - [`signature`]: YAML 기반 시그니처 규칙 엔진 (substring/regex, any/all/groups)
//! - [`classifier`]: 구조적 지문으로 콘텐츠 형식 판별
//! - [`scorer`]: 형식별 필드 추출 및 위험 등급 판정
//! - [`report`]: 불변 스캔 결과와 평면 key/value 변환
//! - [`export`]: JSON/평문 리포트 내보내기
//! - [`engine`]: 전체 스캔 오케스트레이션 및 배치 워커 풀
//! - [`config`]: 엔진 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! ByteAnalyzer -> FormatClassifier -> RiskScorer -> ReportBuilder -> ReportExporter
//!      |                |                 |               |
//!  entropy/magic    fingerprints    SignatureEngine   ScanResult
//! ```

pub mod bytes;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod report;
pub mod scorer;
pub mod signature;
pub mod types;

// --- 주요 타입 re-export ---

// 엔진
pub use engine::{ForensicEngine, ForensicEngineBuilder, ScanInput};

// 설정
pub use config::{EngineConfig, EngineConfigBuilder};

// 에러
pub use error::ForensicError;

// 분석 단계
pub use bytes::{ByteAnalyzer, MagicTable, looks_like_text};
pub use classifier::FormatClassifier;
pub use scorer::{RiskScorer, ScoreOutcome};
pub use signature::{RuleLoader, SignatureEngine, SignatureRule};

// 결과 및 내보내기
pub use export::{JsonExporter, ReportExporter, TextExporter};
pub use report::{ReportBuilder, ScanResult};
pub use types::{ByteProfile, ContentFormat};
