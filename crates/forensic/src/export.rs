//! 리포트 내보내기 -- `ScanResult`를 영속화용 바이트로 변환합니다.
//!
//! 파일 쓰기는 호출자가 담당합니다. 여기서는 `save(report) -> bytes` 계약만 구현합니다.

use std::fmt::{self, Write};

use kinix_core::error::ExportError;

use crate::error::ForensicError;
use crate::report::ScanResult;

/// 리포트 내보내기 trait
pub trait ReportExporter: Send + Sync {
    /// 형식 이름 (파일 확장자로도 사용)
    fn format_name(&self) -> &str;

    /// 결과를 바이트로 직렬화합니다.
    fn export(&self, result: &ScanResult) -> Result<Vec<u8>, ForensicError>;
}

/// 보기 좋게 정렬된 JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter;

impl ReportExporter for JsonExporter {
    fn format_name(&self) -> &str {
        "json"
    }

    fn export(&self, result: &ScanResult) -> Result<Vec<u8>, ForensicError> {
        serde_json::to_vec_pretty(result)
            .map_err(|e| ForensicError::Export(ExportError::Serialize(e.to_string())))
    }
}

/// 사람이 읽는 평문 리포트
#[derive(Debug, Default, Clone, Copy)]
pub struct TextExporter;

impl ReportExporter for TextExporter {
    fn format_name(&self) -> &str {
        "txt"
    }

    fn export(&self, result: &ScanResult) -> Result<Vec<u8>, ForensicError> {
        let mut out = String::new();
        write_report(&mut out, result)
            .map_err(|e| ForensicError::Export(ExportError::Serialize(e.to_string())))?;
        Ok(out.into_bytes())
    }
}

fn write_report<W: Write>(out: &mut W, result: &ScanResult) -> fmt::Result {
    let rule = "=".repeat(60);

    writeln!(out, "{rule}")?;
    writeln!(out, "KINIX FORENSIC REPORT")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "Source : {}", result.id)?;
    writeln!(out, "Format : {}", result.format)?;
    writeln!(out, "Tier   : {}", result.tier)?;
    writeln!(out, "Score  : {}", result.score)?;
    writeln!(out)?;

    if result.findings.is_empty() {
        writeln!(out, "No findings.")?;
    } else {
        writeln!(out, "Findings:")?;
        for finding in &result.findings {
            writeln!(out, "  - {finding}")?;
        }
    }

    writeln!(out)?;
    match &result.byte_profile {
        Some(profile) => writeln!(
            out,
            "Bytes: {} | entropy {:.3} | magic {}",
            profile.size_bytes,
            profile.entropy,
            if profile.magic_ok { "ok" } else { "MISMATCH" }
        )?,
        None => writeln!(out, "Bytes: (text scan)")?,
    }
    writeln!(
        out,
        "Generated by kinix-forensic {}",
        env!("CARGO_PKG_VERSION")
    )
}

/// 형식 이름으로 내보내기 구현을 선택합니다 (`json`, `text`/`txt`).
pub fn exporter_for(name: &str) -> Option<Box<dyn ReportExporter>> {
    match name.to_ascii_lowercase().as_str() {
        "json" => Some(Box::new(JsonExporter)),
        "text" | "txt" => Some(Box::new(TextExporter)),
        _ => None,
    }
}
