use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Encoding used for the transformed manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Path to the vanilla Diego deployment manifest
    #[arg(long = "diego", value_name = "PATH")]
    pub diego_manifest: PathBuf,

    /// Path to the CF credentials used by the acceptance errand; its `api`
    /// entry also supplies the system domain
    #[arg(long = "cf-creds", value_name = "PATH", help_heading = "Inputs")]
    pub cf_creds: Option<PathBuf>,

    /// System domain connet registers its route under (overrides the one derived from --cf-creds)
    #[arg(long, value_name = "DOMAIN", help_heading = "Inputs")]
    pub system_domain: Option<String>,

    /// Path to a TOML file overriding release, database, garden and connet settings
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Write the transformed manifest here instead of stdout
    #[arg(long, short = 'o', value_name = "FILE", help_heading = "Output Options")]
    pub output: Option<PathBuf>,

    /// Encoding of the transformed manifest
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml, help_heading = "Output Options")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', help_heading = "Output Options")]
    pub verbose: bool,
}
