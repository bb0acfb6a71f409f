//! `kinix scan` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use kinix_core::types::RiskTier;
use kinix_forensic::export::exporter_for;
use kinix_forensic::{EngineConfig, ForensicEngine, ScanInput, ScanResult};

use crate::cli::{SaveFormat, ScanArgs};
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Timestamp layout used in saved report file names.
const REPORT_TIMESTAMP_FORMAT: &str = "%d%m%Y_%H%M%S";

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = load_config(config_path).await?;

    let mut engine_config = EngineConfig::from_core(&config.forensic);
    if let Some(ref tier) = args.fail_on {
        engine_config.fail_on = parse_tier(tier)?;
    }
    let fail_on = engine_config.fail_on;

    let engine = ForensicEngine::from_config(engine_config).await?;

    let run_id = Uuid::new_v4();
    info!(%run_id, files = args.paths.len(), "starting forensic scan");

    let inputs = read_inputs(&args.paths, engine.config().max_file_size).await?;
    let results = engine.scan_batch(&inputs);
    let flagged = results
        .iter()
        .filter(|r| engine.exceeds_threshold(r))
        .count();

    let saved = if args.save {
        save_reports(&results, Path::new(&config.general.report_dir), args.save_format).await?
    } else {
        Vec::new()
    };

    let report = ScanReport::new(run_id, fail_on, results, saved);
    writer.render(&report)?;

    if flagged > 0 {
        return Err(CliError::Threshold {
            flagged,
            tier: fail_on,
        });
    }

    Ok(())
}

fn parse_tier(s: &str) -> Result<RiskTier, CliError> {
    RiskTier::from_str_loose(s).ok_or_else(|| {
        CliError::Command(format!(
            "invalid tier: {s} (expected: safe, low, medium, critical)"
        ))
    })
}

/// Read every path into memory. Directories and oversized files are rejected.
async fn read_inputs(paths: &[PathBuf], max_file_size: usize) -> Result<Vec<ScanInput>, CliError> {
    let mut inputs = Vec::with_capacity(paths.len());

    for path in paths {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| with_path(path, e))?;

        if metadata.is_dir() {
            return Err(CliError::Command(format!(
                "{} is a directory; pass individual files",
                path.display()
            )));
        }

        if metadata.len() > max_file_size as u64 {
            return Err(CliError::Command(format!(
                "{}: file too large: {} bytes (max: {max_file_size})",
                path.display(),
                metadata.len()
            )));
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| with_path(path, e))?;
        inputs.push(ScanInput::from_file(path, bytes));
    }

    Ok(inputs)
}

fn with_path(path: &Path, e: std::io::Error) -> CliError {
    CliError::Io(std::io::Error::new(
        e.kind(),
        format!("{}: {e}", path.display()),
    ))
}

/// Write each result as `kinix_report_<DDMMYYYY_HHMMSS>_<n>.<ext>` under `dir`.
async fn save_reports(
    results: &[ScanResult],
    dir: &Path,
    format: SaveFormat,
) -> Result<Vec<String>, CliError> {
    let exporter = exporter_for(format.exporter_name()).ok_or_else(|| {
        CliError::Command(format!("unsupported save format: {}", format.exporter_name()))
    })?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| with_path(dir, e))?;

    let stamp = chrono::Local::now().format(REPORT_TIMESTAMP_FORMAT).to_string();
    let mut saved = Vec::with_capacity(results.len());

    for (n, result) in results.iter().enumerate() {
        let bytes = exporter.export(result)?;
        let path = dir.join(report_file_name(&stamp, n + 1, exporter.format_name()));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| with_path(&path, e))?;
        info!(id = %result.id, path = %path.display(), "report saved");
        saved.push(path.display().to_string());
    }

    if saved.is_empty() {
        warn!("no results to save");
    }

    Ok(saved)
}

fn report_file_name(stamp: &str, n: usize, extension: &str) -> String {
    format!("kinix_report_{stamp}_{n}.{extension}")
}

#[derive(Serialize)]
pub struct ScanReport {
    pub run_id: Uuid,
    pub fail_on: RiskTier,
    pub summary: TierSummary,
    pub results: Vec<ScanResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub saved: Vec<String>,
}

impl ScanReport {
    fn new(run_id: Uuid, fail_on: RiskTier, results: Vec<ScanResult>, saved: Vec<String>) -> Self {
        let mut summary = TierSummary::default();
        for result in &results {
            summary.add(result.tier);
        }
        Self {
            run_id,
            fail_on,
            summary,
            results,
            saved,
        }
    }
}

#[derive(Serialize, Default)]
pub struct TierSummary {
    pub critical: usize,
    pub medium: usize,
    pub low: usize,
    pub safe: usize,
    pub total: usize,
}

impl TierSummary {
    fn add(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::Critical => self.critical += 1,
            RiskTier::Medium => self.medium += 1,
            RiskTier::Low => self.low += 1,
            RiskTier::Safe => self.safe += 1,
        }
        self.total += 1;
    }
}

fn colored_tier(tier: RiskTier) -> colored::ColoredString {
    use colored::Colorize;

    let label = tier.to_string();
    match tier {
        RiskTier::Critical => label.red().bold(),
        RiskTier::Medium => label.yellow(),
        RiskTier::Low => label.normal(),
        RiskTier::Safe => label.green(),
    }
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        for result in &self.results {
            writeln!(
                w,
                "{}  [{}]  {}  score {}",
                result.id.bold(),
                result.format,
                colored_tier(result.tier),
                result.score
            )?;

            if let Some(profile) = &result.byte_profile {
                let magic = if profile.magic_ok {
                    "ok".normal()
                } else {
                    "MISMATCH".red()
                };
                writeln!(
                    w,
                    "    {} bytes, entropy {:.2}, magic {}",
                    profile.size_bytes, profile.entropy, magic
                )?;
            }

            if result.findings.is_empty() {
                writeln!(w, "    {}", "no findings".dimmed())?;
            }
            for finding in &result.findings {
                if finding.is_informational() {
                    writeln!(w, "    {} {}", "·".dimmed(), finding)?;
                } else {
                    writeln!(w, "    - {finding}")?;
                }
            }
            writeln!(w)?;
        }

        let summary = format!(
            "{} file(s): C:{} M:{} L:{} S:{}",
            self.summary.total,
            self.summary.critical,
            self.summary.medium,
            self.summary.low,
            self.summary.safe
        );
        let at_or_above = self
            .results
            .iter()
            .filter(|r| r.tier >= self.fail_on)
            .count();
        if at_or_above > 0 {
            writeln!(w, "Summary: {}", summary.red().bold())?;
        } else {
            writeln!(w, "Summary: {}", summary.green().bold())?;
        }
        writeln!(w, "Fail on: {}", self.fail_on)?;

        for path in &self.saved {
            writeln!(w, "Saved: {path}")?;
        }

        Ok(())
    }
}
