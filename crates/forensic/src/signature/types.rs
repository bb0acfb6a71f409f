//! 시그니처 규칙 데이터 타입
//!
//! YAML 규칙 파일에서 역직렬화되는 구조체들을 정의합니다.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ForensicError;

/// 규칙 ID 최대 길이
const MAX_RULE_ID_LEN: usize = 256;

/// 시그니처 규칙 -- 이름 붙은 패턴들의 불리언 조합입니다.
///
/// # YAML 스키마
/// ```yaml
/// id: malicious_macro
/// name: Malicious Macro
/// description: Office macro spawning a shell
/// status: enabled
/// combinator:
///   groups: [[create, shell], [create, wscript]]
/// patterns:
///   - slot: create
///     value: createobject
///   - slot: shell
///     value: shell
///   - slot: wscript
///     kind: regex
///     value: 'wscript\.\w+'
/// tags:
///   - document
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRule {
    /// 규칙 고유 ID
    pub id: String,
    /// 표시 이름 (관찰 항목 레이블로 사용)
    pub name: String,
    /// 규칙 설명
    #[serde(default)]
    pub description: String,
    /// 규칙 상태
    #[serde(default)]
    pub status: RuleStatus,
    /// 패턴 결합 방식
    #[serde(default)]
    pub combinator: Combinator,
    /// 패턴 목록 (선언 순서 유지)
    pub patterns: Vec<Pattern>,
    /// 분류 태그
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SignatureRule {
    /// 모든 패턴을 OR로 결합한 대소문자 무시 부분 문자열 규칙을 만듭니다.
    pub fn any_substring(id: &str, name: &str, needles: &[&str]) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            description: String::new(),
            status: RuleStatus::Enabled,
            combinator: Combinator::Any,
            patterns: needles
                .iter()
                .enumerate()
                .map(|(idx, needle)| Pattern::substring(format!("p{idx}"), *needle))
                .collect(),
            tags: Vec::new(),
        }
    }

    /// 활성 상태인지 확인합니다.
    pub fn is_enabled(&self) -> bool {
        self.status == RuleStatus::Enabled
    }

    /// 규칙의 유효성을 검증합니다.
    ///
    /// 정규식 문법은 [`RuleMatcher`](super::RuleMatcher)가 컴파일 시 검증합니다.
    pub fn validate(&self) -> Result<(), ForensicError> {
        if self.id.is_empty() {
            return Err(self.invalid("rule id must not be empty"));
        }

        if self.id.len() > MAX_RULE_ID_LEN {
            return Err(self.invalid(&format!(
                "rule id must not exceed {MAX_RULE_ID_LEN} characters"
            )));
        }

        if self.name.trim().is_empty() {
            return Err(self.invalid("rule name must not be empty"));
        }

        if self.patterns.is_empty() {
            return Err(self.invalid("rule must declare at least one pattern"));
        }

        let mut slots = HashSet::new();
        for (idx, pattern) in self.patterns.iter().enumerate() {
            if pattern.slot.is_empty() {
                return Err(self.invalid(&format!("pattern[{idx}] slot must not be empty")));
            }
            if pattern.value.is_empty() {
                return Err(self.invalid(&format!(
                    "pattern '{}' value must not be empty",
                    pattern.slot
                )));
            }
            if !slots.insert(pattern.slot.as_str()) {
                return Err(self.invalid(&format!("duplicate slot '{}'", pattern.slot)));
            }
        }

        if let Combinator::Groups(groups) = &self.combinator {
            if groups.is_empty() {
                return Err(self.invalid("groups combinator needs at least one group"));
            }
            for (gidx, group) in groups.iter().enumerate() {
                if group.is_empty() {
                    return Err(self.invalid(&format!("group[{gidx}] must not be empty")));
                }
                if let Some(unknown) = group.iter().find(|s| !slots.contains(s.as_str())) {
                    return Err(
                        self.invalid(&format!("group[{gidx}] references unknown slot '{unknown}'"))
                    );
                }
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: &str) -> ForensicError {
        ForensicError::RuleValidation {
            rule_id: if self.id.is_empty() {
                "(empty)".to_owned()
            } else {
                self.id.clone()
            },
            reason: reason.to_owned(),
        }
    }
}

/// 규칙 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    /// 활성화 (기본값)
    #[default]
    Enabled,
    /// 비활성화 -- 로드되지만 평가하지 않음
    Disabled,
}

impl RuleStatus {
    /// 소문자 식별자
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

/// 단일 패턴
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// 조합식에서 참조하는 슬롯 이름
    pub slot: String,
    /// 매칭 방식
    #[serde(default)]
    pub kind: PatternKind,
    /// 찾을 문자열 또는 정규식
    pub value: String,
    /// 대소문자 무시 여부
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,
}

impl Pattern {
    /// 대소문자 무시 부분 문자열 패턴을 만듭니다.
    pub fn substring(slot: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            kind: PatternKind::Substring,
            value: value.into(),
            case_insensitive: true,
        }
    }

    /// 대소문자 무시 정규식 패턴을 만듭니다.
    pub fn regex(slot: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            kind: PatternKind::Regex,
            value: value.into(),
            case_insensitive: true,
        }
    }
}

fn default_case_insensitive() -> bool {
    true
}

/// 패턴 매칭 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// 부분 문자열 포함 (기본값)
    #[default]
    Substring,
    /// 정규식 검색
    Regex,
}

/// 패턴 결합 방식
///
/// YAML에서는 `any`, `all` 키워드 또는 `groups: [[a, b], [a, c]]` 매핑으로 표기합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CombinatorRepr", into = "CombinatorRepr")]
pub enum Combinator {
    /// 하나라도 매칭되면 참 (OR)
    #[default]
    Any,
    /// 모두 매칭되어야 참 (AND)
    All,
    /// 그룹 내 슬롯이 모두 매칭되는 그룹이 하나라도 있으면 참 (OR of AND)
    Groups(Vec<Vec<String>>),
}

/// YAML 표기용 중간 표현
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum CombinatorRepr {
    Keyword(String),
    Groups { groups: Vec<Vec<String>> },
}

impl TryFrom<CombinatorRepr> for Combinator {
    type Error = String;

    fn try_from(repr: CombinatorRepr) -> Result<Self, Self::Error> {
        match repr {
            CombinatorRepr::Keyword(k) => match k.trim().to_lowercase().as_str() {
                "any" | "or" => Ok(Self::Any),
                "all" | "and" => Ok(Self::All),
                other => Err(format!(
                    "unknown combinator '{other}', expected any, all or groups"
                )),
            },
            CombinatorRepr::Groups { groups } => Ok(Self::Groups(groups)),
        }
    }
}

impl From<Combinator> for CombinatorRepr {
    fn from(c: Combinator) -> Self {
        match c {
            Combinator::Any => Self::Keyword("any".to_owned()),
            Combinator::All => Self::Keyword("all".to_owned()),
            Combinator::Groups(groups) => Self::Groups { groups },
        }
    }
}
