//! 내장 시그니처 규칙 세트
//!
//! 설정으로 교체할 수 있지만, 기본 동작은 이 목록을 그대로 사용합니다.

use super::types::{Combinator, Pattern, RuleStatus, SignatureRule};

/// 텍스트/로그용 기본 규칙 (선언 순서가 보고 순서)
pub fn default_rules() -> Vec<SignatureRule> {
    vec![
        tagged(
            SignatureRule::any_substring(
                "sql_injection",
                "SQL Injection",
                &["union select", "or 1=1", "drop table"],
            ),
            "SQL injection markers in request or query logs",
            &["injection", "web"],
        ),
        tagged(
            SignatureRule::any_substring(
                "xss",
                "Cross-Site Scripting",
                &["<script>", "javascript:", "onerror="],
            ),
            "Script injection markers",
            &["injection", "web"],
        ),
        tagged(
            SignatureRule::any_substring(
                "path_traversal",
                "Path Traversal",
                &["../", "/etc/passwd", "c:\\windows\\system32"],
            ),
            "Directory traversal and sensitive system path access",
            &["traversal", "filesystem"],
        ),
        tagged(
            SignatureRule::any_substring(
                "brute_force",
                "Brute Force",
                &["failed password", "authentication failure", "too many attempts"],
            ),
            "Repeated authentication failures",
            &["authentication"],
        ),
        tagged(
            SignatureRule::any_substring(
                "critical_failure",
                "Critical System Failure",
                &["fatal error", "kernel panic", "segmentation fault"],
            ),
            "Catastrophic process or kernel errors",
            &["stability"],
        ),
    ]
}

/// 바이너리/문서 버퍼용 매크로 규칙
pub fn document_rules() -> Vec<SignatureRule> {
    vec![
        tagged(
            SignatureRule::any_substring(
                "suspicious_script",
                "Suspicious Script",
                &["createobject", "shell", "eval(", "base64_decode"],
            ),
            "Embedded scripting primitives",
            &["document", "script"],
        ),
        SignatureRule {
            id: "malicious_macro".to_owned(),
            name: "Malicious Macro".to_owned(),
            description: "Macro object creation combined with a shell host".to_owned(),
            status: RuleStatus::Enabled,
            combinator: Combinator::Groups(vec![
                vec!["create".to_owned(), "shell".to_owned()],
                vec!["create".to_owned(), "wscript".to_owned()],
            ]),
            patterns: vec![
                Pattern::substring("create", "createobject"),
                Pattern::substring("shell", "shell"),
                Pattern::substring("wscript", "wscript"),
            ],
            tags: vec!["document".to_owned(), "macro".to_owned()],
        },
    ]
}

fn tagged(mut rule: SignatureRule, description: &str, tags: &[&str]) -> SignatureRule {
    rule.description = description.to_owned();
    rule.tags = tags.iter().map(|t| (*t).to_owned()).collect();
    rule
}
