use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// JSON file holding the input rows
    pub input: PathBuf,

    /// Output path for the JSON report (None = print to stdout)
    pub output: Option<PathBuf>,

    /// Optional TOML configuration file
    pub config: Option<PathBuf>,

    /// First cohort key to include (overrides config)
    pub from: Option<String>,

    /// Last cohort key to include (overrides config)
    pub to: Option<String>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Timeline rows shown in the summary (overrides config)
    pub summary_rows: Option<usize>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: Some(PathBuf::from("artifacts/payback.json")),
            config: None,
            from: None,
            to: None,
            print_summary: false,
            summary_rows: None,
        }
    }
}
