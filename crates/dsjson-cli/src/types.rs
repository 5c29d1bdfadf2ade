use std::path::PathBuf;

/// Outcome of one subcommand over all its input files.
#[derive(Debug)]
pub struct BatchResult {
    pub command: &'static str,
    pub output_dir: PathBuf,
    pub files: Vec<FileSummary>,
}

impl BatchResult {
    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_some()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.failed() > 0
    }
}

/// What happened to one input file.
#[derive(Debug)]
pub struct FileSummary {
    pub input: PathBuf,
    pub datasets: Vec<String>,
    pub outputs: Vec<PathBuf>,
    pub error: Option<String>,
}

/// One column as shown by the `datasets` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnListing {
    pub dataset: String,
    pub column: String,
    pub data_type: String,
    pub length: Option<u32>,
    pub label: Option<String>,
}
