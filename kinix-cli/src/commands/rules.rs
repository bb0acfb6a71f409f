//! `kinix rules` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use kinix_forensic::signature::{
    Combinator, RuleLoader, RuleStatus, SignatureRule, default_rules, document_rules,
};

use crate::cli::{RulesAction, RulesArgs};
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `rules` command.
pub async fn execute(
    args: RulesArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        RulesAction::List { dir, status } => execute_list(config_path, dir, status, writer).await,
        RulesAction::Validate { path } => execute_validate(&path, writer).await,
    }
}

async fn execute_list(
    config_path: &Path,
    dir: Option<PathBuf>,
    status_filter: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let status_filter = status_filter.as_deref().map(parse_status).transpose()?;

    let rules_dir = match dir {
        Some(dir) => Some(dir),
        None => {
            let config = load_config(config_path).await?;
            (!config.forensic.rules_dir.is_empty())
                .then(|| PathBuf::from(config.forensic.rules_dir))
        }
    };

    let (source, rules) = match rules_dir {
        Some(dir) => {
            info!(rules_dir = %dir.display(), "loading signature rules");
            let rules = RuleLoader::load_directory(&dir).await?;
            (dir.display().to_string(), tag_set(rules, "text"))
        }
        None => {
            let mut rules = tag_set(default_rules(), "text");
            rules.extend(tag_set(document_rules(), "document"));
            ("built-in".to_owned(), rules)
        }
    };

    let entries: Vec<RuleEntry> = rules
        .into_iter()
        .filter(|(rule, _)| status_filter.is_none_or(|s| rule.status == s))
        .map(|(rule, set)| RuleEntry::from_rule(rule, set))
        .collect();

    let report = RuleListReport {
        source,
        total: entries.len(),
        rules: entries,
    };

    writer.render(&report)?;

    Ok(())
}

fn tag_set(rules: Vec<SignatureRule>, set: &'static str) -> Vec<(SignatureRule, &'static str)> {
    rules.into_iter().map(|r| (r, set)).collect()
}

fn parse_status(s: &str) -> Result<RuleStatus, CliError> {
    match s.to_lowercase().as_str() {
        "enabled" => Ok(RuleStatus::Enabled),
        "disabled" => Ok(RuleStatus::Disabled),
        _ => Err(CliError::Command(format!(
            "invalid status: {s} (expected: enabled, disabled)"
        ))),
    }
}

fn describe_combinator(combinator: &Combinator) -> String {
    match combinator {
        Combinator::Any => "any".to_owned(),
        Combinator::All => "all".to_owned(),
        Combinator::Groups(groups) => groups
            .iter()
            .map(|g| format!("({})", g.join(" & ")))
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

async fn execute_validate(path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %path.display(), "validating signature rules");

    let checks = RuleLoader::validate_directory(path).await?;

    let mut files = Vec::with_capacity(checks.len());
    let mut valid_rules = 0;
    for check in checks {
        let file = check.path.display().to_string();
        match check.outcome {
            Ok(count) => {
                valid_rules += count;
                files.push(FileResult {
                    file,
                    rules: count,
                    error: None,
                });
            }
            Err(error) => files.push(FileResult {
                file,
                rules: 0,
                error: Some(error),
            }),
        }
    }

    let invalid = files.iter().filter(|f| f.error.is_some()).count();
    let report = RuleValidationReport {
        path: path.display().to_string(),
        total_files: files.len(),
        valid_rules,
        invalid_files: invalid,
        files,
    };

    writer.render(&report)?;

    if invalid > 0 {
        return Err(CliError::Rule(format!("{invalid} invalid rule file(s)")));
    }

    Ok(())
}

#[derive(Serialize)]
pub struct RuleListReport {
    pub source: String,
    pub total: usize,
    pub rules: Vec<RuleEntry>,
}

#[derive(Serialize)]
pub struct RuleEntry {
    pub id: String,
    pub name: String,
    pub set: String,
    pub status: String,
    pub combinator: String,
    pub patterns: usize,
    pub tags: Vec<String>,
}

impl RuleEntry {
    fn from_rule(rule: SignatureRule, set: &str) -> Self {
        Self {
            combinator: describe_combinator(&rule.combinator),
            patterns: rule.patterns.len(),
            status: rule.status.as_str().to_owned(),
            set: set.to_owned(),
            id: rule.id,
            name: rule.name,
            tags: rule.tags,
        }
    }
}

impl Render for RuleListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Signature Rules ({}) from {}", self.total, self.source.bold())?;
        writeln!(w)?;

        if self.rules.is_empty() {
            writeln!(w, "No rules found.")?;
            return Ok(());
        }

        writeln!(
            w,
            "{:<20} {:<26} {:<9} {:<9} {:<9} Tags",
            "ID", "Name", "Set", "Status", "Patterns"
        )?;
        writeln!(w, "{}", "-".repeat(90))?;

        for rule in &self.rules {
            let status = if rule.status == "enabled" {
                rule.status.green()
            } else {
                rule.status.dimmed()
            };
            writeln!(
                w,
                "{:<20} {:<26} {:<9} {:<9} {:<9} {}",
                rule.id,
                rule.name,
                rule.set,
                status,
                rule.patterns,
                rule.tags.join(", ")
            )?;
        }

        Ok(())
    }
}

#[derive(Serialize)]
pub struct RuleValidationReport {
    pub path: String,
    pub total_files: usize,
    pub valid_rules: usize,
    pub invalid_files: usize,
    pub files: Vec<FileResult>,
}

#[derive(Serialize)]
pub struct FileResult {
    pub file: String,
    pub rules: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Render for RuleValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Rule Validation: {}", self.path.bold())?;
        writeln!(w, "  Files: {}", self.total_files)?;
        writeln!(w, "  Valid rules: {}", self.valid_rules)?;

        if self.invalid_files == 0 {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(
                w,
                "  Result: {} ({} file(s))",
                "INVALID".red().bold(),
                self.invalid_files
            )?;
        }

        for file in &self.files {
            match &file.error {
                Some(error) => writeln!(w, "  {} {}: {}", "x".red(), file.file, error.red())?,
                None => writeln!(w, "  {} {} ({} rule(s))", "ok".green(), file.file, file.rules)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("Enabled").unwrap(), RuleStatus::Enabled);
        assert_eq!(parse_status("disabled").unwrap(), RuleStatus::Disabled);
        assert!(parse_status("test").is_err());
    }

    #[test]
    fn test_describe_combinator_groups() {
        let combinator = Combinator::Groups(vec![
            vec!["create".to_owned(), "shell".to_owned()],
            vec!["create".to_owned(), "wscript".to_owned()],
        ]);
        assert_eq!(
            describe_combinator(&combinator),
            "(create & shell) | (create & wscript)"
        );
        assert_eq!(describe_combinator(&Combinator::Any), "any");
    }

    #[test]
    fn test_rule_entry_from_builtin() {
        let rule = default_rules().remove(0);
        let entry = RuleEntry::from_rule(rule, "text");
        assert_eq!(entry.name, "SQL Injection");
        assert_eq!(entry.status, "enabled");
        assert_eq!(entry.patterns, 3);
    }

    #[test]
    fn test_rule_list_report_render_empty() {
        let report = RuleListReport {
            source: "built-in".to_owned(),
            total: 0,
            rules: Vec::new(),
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("No rules found."));
    }

    #[tokio::test]
    async fn test_validate_reports_invalid_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("good.yml"),
            "id: ok\nname: Ok\npatterns:\n  - slot: a\n    value: x\n",
        )
        .expect("write");
        std::fs::write(
            dir.path().join("bad.yml"),
            "id: bad\nname: Bad\npatterns:\n  - slot: a\n    kind: regex\n    value: \"(\"\n",
        )
        .expect("write");

        let writer = OutputWriter::new(OutputFormat::Json);
        let err = execute_validate(dir.path(), &writer)
            .await
            .expect_err("invalid file should fail validation");
        assert!(matches!(err, CliError::Rule(_)));
    }

    #[tokio::test]
    async fn test_list_from_explicit_dir_with_filter() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("rules.yaml"),
            "- id: on\n  name: On\n  patterns:\n    - slot: a\n      value: x\n\
             - id: off\n  name: Off\n  status: disabled\n  patterns:\n    - slot: a\n      value: y\n",
        )
        .expect("write");

        let writer = OutputWriter::new(OutputFormat::Json);
        execute_list(
            Path::new("/nonexistent/kinix.toml"),
            Some(dir.path().to_path_buf()),
            Some("disabled".to_owned()),
            &writer,
        )
        .await
        .expect("listing an explicit dir should not need a config file");
    }
}
