//! CLI-specific error types and exit code mapping

use kinix_core::error::KinixError;
use kinix_core::types::RiskTier;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// At least one scan result reached the `fail_on` tier.
    #[error("{flagged} result(s) at or above tier {tier}")]
    Threshold { flagged: usize, tier: RiskTier },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from kinix-core.
    #[error("{0}")]
    Core(#[from] KinixError),

    /// Rule validation reported invalid files.
    #[error("rule error: {0}")]
    Rule(String),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | General / command / rule error            |
    /// | 2    | Configuration error                       |
    /// | 4    | A scan result reached the `fail_on` tier  |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(KinixError::Config(_)) => 2,
            Self::Threshold { .. } => 4,
            Self::Io(_) | Self::Core(KinixError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) | Self::Rule(_) => 1,
        }
    }
}

impl From<kinix_forensic::ForensicError> for CliError {
    fn from(e: kinix_forensic::ForensicError) -> Self {
        Self::Core(e.into())
    }
}
