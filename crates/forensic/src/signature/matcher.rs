//! 규칙 매칭 로직 -- 패턴 평가 및 정규식 캐싱
//!
//! [`RuleMatcher`]는 규칙의 패턴을 텍스트에 대해 평가합니다.
//! 정규식 패턴은 엔진 구성 시 한 번만 컴파일하여 캐싱합니다.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use super::types::{Combinator, Pattern, PatternKind, SignatureRule};
use crate::error::ForensicError;

/// 컴파일된 정규식 최대 크기 (바이트)
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// 평가 대상 텍스트
///
/// 대소문자 무시 부분 문자열 매칭을 위해 소문자 사본을 한 번만 만듭니다.
pub struct Haystack<'a> {
    raw: &'a str,
    lower: String,
}

impl<'a> Haystack<'a> {
    /// 텍스트로 haystack을 만듭니다.
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
        }
    }

    /// 원본 텍스트
    pub fn raw(&self) -> &str {
        self.raw
    }
}

/// 규칙 매처 -- 패턴 평가 및 정규식 캐싱
pub struct RuleMatcher {
    /// 컴파일된 정규식 캐시: (rule_id, pattern_index) -> Regex
    regex_cache: HashMap<(String, usize), Regex>,
    /// 소문자로 정규화한 부분 문자열 캐시: (rule_id, pattern_index) -> needle
    needle_cache: HashMap<(String, usize), String>,
}

impl RuleMatcher {
    /// 새 매처를 생성합니다.
    pub fn new() -> Self {
        Self {
            regex_cache: HashMap::new(),
            needle_cache: HashMap::new(),
        }
    }

    /// 규칙의 패턴을 미리 컴파일합니다.
    ///
    /// 정규식 문법 오류는 `RuleValidation` 에러가 됩니다.
    pub fn compile_rule(&mut self, rule: &SignatureRule) -> Result<(), ForensicError> {
        for (idx, pattern) in rule.patterns.iter().enumerate() {
            let key = (rule.id.clone(), idx);
            match pattern.kind {
                PatternKind::Regex => {
                    let regex = RegexBuilder::new(&pattern.value)
                        .case_insensitive(pattern.case_insensitive)
                        .size_limit(REGEX_SIZE_LIMIT)
                        .build()
                        .map_err(|e| ForensicError::RuleValidation {
                            rule_id: rule.id.clone(),
                            reason: format!(
                                "invalid regex in pattern '{}': {e}",
                                pattern.slot
                            ),
                        })?;
                    self.regex_cache.insert(key, regex);
                }
                PatternKind::Substring if pattern.case_insensitive => {
                    self.needle_cache.insert(key, pattern.value.to_lowercase());
                }
                PatternKind::Substring => {}
            }
        }
        Ok(())
    }

    /// 규칙 제거 시 캐시를 정리합니다.
    pub fn remove_rule(&mut self, rule_id: &str) {
        self.regex_cache.retain(|(id, _), _| id != rule_id);
        self.needle_cache.retain(|(id, _), _| id != rule_id);
    }

    /// 규칙의 조합식이 텍스트에 대해 참인지 평가합니다.
    ///
    /// 컴파일되지 않은 정규식 패턴은 매칭 실패로 취급합니다.
    pub fn matches(&self, rule: &SignatureRule, haystack: &Haystack<'_>) -> bool {
        match &rule.combinator {
            Combinator::Any => rule
                .patterns
                .iter()
                .enumerate()
                .any(|(idx, p)| self.pattern_matches(&rule.id, idx, p, haystack)),
            Combinator::All => rule
                .patterns
                .iter()
                .enumerate()
                .all(|(idx, p)| self.pattern_matches(&rule.id, idx, p, haystack)),
            Combinator::Groups(groups) => {
                let hits: HashMap<&str, bool> = rule
                    .patterns
                    .iter()
                    .enumerate()
                    .map(|(idx, p)| {
                        (
                            p.slot.as_str(),
                            self.pattern_matches(&rule.id, idx, p, haystack),
                        )
                    })
                    .collect();
                groups.iter().any(|group| {
                    group
                        .iter()
                        .all(|slot| hits.get(slot.as_str()).copied().unwrap_or(false))
                })
            }
        }
    }

    fn pattern_matches(
        &self,
        rule_id: &str,
        idx: usize,
        pattern: &Pattern,
        haystack: &Haystack<'_>,
    ) -> bool {
        let key = (rule_id.to_owned(), idx);
        match pattern.kind {
            PatternKind::Regex => self
                .regex_cache
                .get(&key)
                .is_some_and(|re| re.is_match(haystack.raw)),
            PatternKind::Substring if pattern.case_insensitive => {
                match self.needle_cache.get(&key) {
                    Some(needle) => haystack.lower.contains(needle.as_str()),
                    None => haystack.lower.contains(&pattern.value.to_lowercase()),
                }
            }
            PatternKind::Substring => haystack.raw.contains(pattern.value.as_str()),
        }
    }
}

impl Default for RuleMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::types::RuleStatus;

    fn compiled(rule: &SignatureRule) -> RuleMatcher {
        let mut matcher = RuleMatcher::new();
        matcher.compile_rule(rule).unwrap();
        matcher
    }

    fn macro_rule() -> SignatureRule {
        SignatureRule {
            id: "macro".to_owned(),
            name: "Malicious Macro".to_owned(),
            description: String::new(),
            status: RuleStatus::Enabled,
            combinator: Combinator::Groups(vec![
                vec!["a".to_owned(), "b".to_owned()],
                vec!["a".to_owned(), "c".to_owned()],
            ]),
            patterns: vec![
                Pattern::substring("a", "CreateObject"),
                Pattern::substring("b", "Shell"),
                Pattern::substring("c", "WScript"),
            ],
            tags: vec![],
        }
    }

    #[test]
    fn any_matches_case_insensitively() {
        let rule = SignatureRule::any_substring("sqli", "SQL Injection", &["union select"]);
        let matcher = compiled(&rule);
        assert!(matcher.matches(&rule, &Haystack::new("id=1 UNION SELECT pw")));
        assert!(!matcher.matches(&rule, &Haystack::new("union  select")));
    }

    #[test]
    fn all_requires_every_pattern() {
        let mut rule = SignatureRule::any_substring("r", "R", &["alpha", "beta"]);
        rule.combinator = Combinator::All;
        let matcher = compiled(&rule);
        assert!(matcher.matches(&rule, &Haystack::new("beta then alpha")));
        assert!(!matcher.matches(&rule, &Haystack::new("alpha only")));
    }

    #[test]
    fn groups_is_or_of_ands() {
        let rule = macro_rule();
        let matcher = compiled(&rule);
        assert!(matcher.matches(&rule, &Haystack::new("CreateObject(\"WScript.Shell\")")));
        assert!(matcher.matches(&rule, &Haystack::new("createobject ... wscript")));
        assert!(!matcher.matches(&rule, &Haystack::new("Shell and WScript alone")));
        assert!(!matcher.matches(&rule, &Haystack::new("CreateObject only")));
    }

    #[test]
    fn case_sensitive_substring() {
        let mut rule = SignatureRule::any_substring("r", "R", &["Token"]);
        rule.patterns[0].case_insensitive = false;
        let matcher = compiled(&rule);
        assert!(matcher.matches(&rule, &Haystack::new("a Token here")));
        assert!(!matcher.matches(&rule, &Haystack::new("a token here")));
    }

    #[test]
    fn regex_pattern_matches() {
        let mut rule = SignatureRule::any_substring("r", "R", &["x"]);
        rule.patterns = vec![Pattern::regex("ip", r"\b\d{1,3}(\.\d{1,3}){3}\b")];
        let matcher = compiled(&rule);
        assert!(matcher.matches(&rule, &Haystack::new("from 10.0.0.1 port")));
        assert!(!matcher.matches(&rule, &Haystack::new("from localhost")));
    }

    #[test]
    fn invalid_regex_rejected_at_compile() {
        let mut rule = SignatureRule::any_substring("bad", "Bad", &["x"]);
        rule.patterns = vec![Pattern::regex("p", "(unclosed")];
        let mut matcher = RuleMatcher::new();
        let err = matcher.compile_rule(&rule).unwrap_err();
        assert!(matches!(err, ForensicError::RuleValidation { .. }));
    }

    #[test]
    fn uncompiled_regex_never_matches() {
        let mut rule = SignatureRule::any_substring("r", "R", &["x"]);
        rule.patterns = vec![Pattern::regex("p", ".*")];
        let matcher = RuleMatcher::new();
        assert!(!matcher.matches(&rule, &Haystack::new("anything")));
    }

    #[test]
    fn remove_rule_clears_cache() {
        let rule = macro_rule();
        let mut matcher = compiled(&rule);
        matcher.remove_rule("macro");
        assert!(matcher.needle_cache.is_empty());
    }
}
