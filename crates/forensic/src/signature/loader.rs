//! 규칙 파일 로더 -- YAML 시그니처 규칙을 디스크에서 로드합니다.
//!
//! 규칙 디렉토리 내의 `.yml`/`.yaml` 파일을 스캔하고 파싱합니다.
//! 파일 하나에는 규칙 하나 또는 규칙 목록이 들어갈 수 있습니다.
//! 개별 파일 로딩 실패는 경고 로그를 남기고 건너뜁니다.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ForensicError;

use super::matcher::RuleMatcher;
use super::types::SignatureRule;

/// 규칙 파일 최대 크기
const MAX_RULE_FILE_SIZE: u64 = 1024 * 1024; // 1MB
/// 디렉토리당 최대 규칙 수
const MAX_RULES_COUNT: usize = 10_000;

/// 단일 규칙 또는 규칙 목록
#[derive(Deserialize)]
#[serde(untagged)]
enum RuleDocument {
    Many(Vec<SignatureRule>),
    One(Box<SignatureRule>),
}

/// 파일 단위 검증 결과
#[derive(Debug)]
pub struct FileCheck {
    /// 규칙 파일 경로
    pub path: PathBuf,
    /// 유효한 규칙 수 또는 실패 사유
    pub outcome: Result<usize, String>,
}

/// 규칙 파일 로더
pub struct RuleLoader;

impl RuleLoader {
    /// 디렉토리에서 모든 YAML 규칙 파일을 로드합니다.
    ///
    /// 파일은 이름순으로 처리되며 중복 ID는 먼저 로드된 규칙이 유지됩니다.
    ///
    /// # Errors
    /// - 디렉토리를 읽을 수 없는 경우
    /// - 규칙 수가 `MAX_RULES_COUNT`를 초과하는 경우
    pub async fn load_directory(
        dir: impl AsRef<Path>,
    ) -> Result<Vec<SignatureRule>, ForensicError> {
        let dir = dir.as_ref();
        let files = Self::yaml_files(dir).await?;

        let mut rules = Vec::new();
        let mut seen_ids = HashSet::new();

        for path in files {
            let loaded = match Self::load_file(&path).await {
                Ok(loaded) => loaded,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to load rule file, skipping"
                    );
                    continue;
                }
            };

            for rule in loaded {
                if !seen_ids.insert(rule.id.clone()) {
                    tracing::warn!(
                        rule_id = %rule.id,
                        path = %path.display(),
                        "duplicate rule id, skipping"
                    );
                    continue;
                }
                rules.push(rule);
            }

            if rules.len() > MAX_RULES_COUNT {
                return Err(ForensicError::RuleLoad {
                    path: dir.display().to_string(),
                    reason: format!("too many rules: max {MAX_RULES_COUNT}"),
                });
            }
        }

        tracing::info!(
            dir = %dir.display(),
            count = rules.len(),
            "loaded signature rules"
        );

        Ok(rules)
    }

    /// 디렉토리의 모든 규칙 파일을 검증하고 파일별 결과를 반환합니다.
    ///
    /// 로딩과 달리 실패한 파일을 건너뛰지 않고 사유를 모읍니다.
    pub async fn validate_directory(
        dir: impl AsRef<Path>,
    ) -> Result<Vec<FileCheck>, ForensicError> {
        let files = Self::yaml_files(dir.as_ref()).await?;
        let mut checks = Vec::with_capacity(files.len());
        for path in files {
            let outcome = Self::load_file(&path)
                .await
                .map(|rules| rules.len())
                .map_err(|e| e.to_string());
            checks.push(FileCheck { path, outcome });
        }
        Ok(checks)
    }

    /// 단일 YAML 파일에서 규칙을 로드합니다.
    pub async fn load_file(path: impl AsRef<Path>) -> Result<Vec<SignatureRule>, ForensicError> {
        let path = path.as_ref();

        // 파일 크기 검증
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ForensicError::RuleLoad {
                path: path.display().to_string(),
                reason: format!("failed to read file metadata: {e}"),
            })?;

        if metadata.len() > MAX_RULE_FILE_SIZE {
            return Err(ForensicError::RuleLoad {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {MAX_RULE_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ForensicError::RuleLoad {
                    path: path.display().to_string(),
                    reason: format!("failed to read file: {e}"),
                })?;

        Self::parse_yaml(&content, &path.display().to_string())
    }

    /// YAML 문자열을 파싱하여 규칙을 생성합니다.
    ///
    /// 구조 검증과 정규식 컴파일까지 통과한 규칙만 반환합니다.
    pub fn parse_yaml(yaml_str: &str, source: &str) -> Result<Vec<SignatureRule>, ForensicError> {
        let document: RuleDocument =
            serde_yaml::from_str(yaml_str).map_err(|e| ForensicError::RuleLoad {
                path: source.to_owned(),
                reason: format!("YAML parse error: {e}"),
            })?;

        let rules = match document {
            RuleDocument::Many(rules) => rules,
            RuleDocument::One(rule) => vec![*rule],
        };

        let mut matcher = RuleMatcher::new();
        for rule in &rules {
            rule.validate()?;
            matcher.compile_rule(rule)?;
        }

        Ok(rules)
    }

    /// 디렉토리의 YAML 파일 목록을 이름순으로 반환합니다.
    async fn yaml_files(dir: &Path) -> Result<Vec<PathBuf>, ForensicError> {
        let mut entries =
            tokio::fs::read_dir(dir)
                .await
                .map_err(|e| ForensicError::RuleLoad {
                    path: dir.display().to_string(),
                    reason: format!("failed to read directory: {e}"),
                })?;

        let mut files = Vec::new();
        while let Some(entry) =
            entries
                .next_entry()
                .await
                .map_err(|e| ForensicError::RuleLoad {
                    path: dir.display().to_string(),
                    reason: format!("failed to read directory entry: {e}"),
                })?
        {
            let path = entry.path();
            let is_yaml = path
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml");
            if is_yaml {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
