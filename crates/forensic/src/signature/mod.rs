//! 시그니처 엔진 -- 이름 붙은 패턴 규칙 평가
//!
//! 규칙은 엔진 생성 시 한 번 검증/컴파일되고 이후 변경되지 않습니다.
//! 평가 결과는 매칭된 규칙 이름의 집합이며, 보고 순서는 규칙 선언 순서를 따릅니다.
//!
//! # 규칙 형식
//! ```yaml
//! id: sql_injection
//! name: SQL Injection
//! combinator: any
//! patterns:
//!   - slot: union
//!     value: union select
//!   - slot: tautology
//!     value: or 1=1
//! ```
//!
//! # 구성
//! - [`SignatureEngine`]: 규칙 관리 및 평가 코디네이터
//! - [`loader`]: YAML 파일 로딩 및 유효성 검증
//! - [`matcher`]: 패턴 매칭 로직 (substring, regex, 조합식)
//! - [`defaults`]: 내장 규칙 세트
//! - [`types`]: 규칙 데이터 구조 정의

pub mod defaults;
pub mod loader;
pub mod matcher;
pub mod types;

pub use defaults::{default_rules, document_rules};
pub use loader::{FileCheck, RuleLoader};
pub use matcher::{Haystack, RuleMatcher};
pub use types::{Combinator, Pattern, PatternKind, RuleStatus, SignatureRule};

use std::collections::HashSet;

use crate::error::ForensicError;

/// 시그니처 엔진
///
/// # 사용 예시
/// ```
/// use kinix_forensic::signature::SignatureEngine;
///
/// let engine = SignatureEngine::with_defaults();
/// let matched = engine.evaluate("GET /?q=1 UNION SELECT password FROM users");
/// assert_eq!(matched, vec!["SQL Injection".to_owned()]);
/// ```
pub struct SignatureEngine {
    /// 선언 순서를 유지하는 규칙 목록
    rules: Vec<SignatureRule>,
    /// 컴파일된 매처
    matcher: RuleMatcher,
}

impl SignatureEngine {
    /// 규칙 목록으로 엔진을 생성합니다.
    ///
    /// # Errors
    /// - 규칙 구조가 유효하지 않은 경우
    /// - 정규식 컴파일에 실패한 경우
    /// - 규칙 ID가 중복된 경우
    pub fn new(rules: Vec<SignatureRule>) -> Result<Self, ForensicError> {
        let mut matcher = RuleMatcher::new();
        let mut seen = HashSet::new();
        for rule in &rules {
            rule.validate()?;
            if !seen.insert(rule.id.as_str()) {
                return Err(ForensicError::RuleValidation {
                    rule_id: rule.id.clone(),
                    reason: "duplicate rule id".to_owned(),
                });
            }
            matcher.compile_rule(rule)?;
        }

        tracing::debug!(count = rules.len(), "signature engine compiled");
        Ok(Self { rules, matcher })
    }

    /// 내장 텍스트 규칙으로 엔진을 생성합니다.
    pub fn with_defaults() -> Self {
        Self::from_builtin(default_rules())
    }

    /// 내장 문서(매크로) 규칙으로 엔진을 생성합니다.
    pub fn with_document_rules() -> Self {
        Self::from_builtin(document_rules())
    }

    /// 내장 규칙은 항상 유효하므로 검증 없이 컴파일합니다.
    fn from_builtin(rules: Vec<SignatureRule>) -> Self {
        let mut matcher = RuleMatcher::new();
        for rule in &rules {
            if let Err(e) = matcher.compile_rule(rule) {
                tracing::error!(rule_id = %rule.id, error = %e, "built-in rule failed to compile");
            }
        }
        Self { rules, matcher }
    }

    /// 텍스트에 매칭된 활성 규칙 이름을 선언 순서로 반환합니다.
    ///
    /// 같은 이름의 규칙이 여러 개 매칭되어도 이름은 한 번만 포함됩니다.
    pub fn evaluate(&self, text: &str) -> Vec<String> {
        let haystack = Haystack::new(text);
        let mut names: Vec<String> = Vec::new();
        for rule in self.matched_rules(&haystack) {
            if !names.iter().any(|n| n == &rule.name) {
                names.push(rule.name.clone());
            }
        }
        names
    }

    /// 바이트 버퍼를 손실 허용 UTF-8로 디코딩하여 평가합니다.
    pub fn evaluate_bytes(&self, bytes: &[u8]) -> Vec<String> {
        self.evaluate(&String::from_utf8_lossy(bytes))
    }

    /// 매칭된 활성 규칙을 선언 순서로 반환합니다.
    pub fn matched_rules<'a>(&'a self, haystack: &Haystack<'_>) -> Vec<&'a SignatureRule> {
        self.rules
            .iter()
            .filter(|rule| rule.is_enabled() && self.matcher.matches(rule, haystack))
            .collect()
    }

    /// 로드된 규칙 목록 (비활성 포함)
    pub fn rules(&self) -> &[SignatureRule] {
        &self.rules
    }

    /// 로드된 규칙 수
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// 활성 규칙 수
    pub fn enabled_count(&self) -> usize {
        self.rules.iter().filter(|r| r.is_enabled()).count()
    }
}

impl std::fmt::Debug for SignatureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureEngine")
            .field("rule_count", &self.rules.len())
            .finish()
    }
}
