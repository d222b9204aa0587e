use crate::OUTPUT_FILE_NAME;
use std::path::PathBuf;

/// Runtime settings for one run of the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub output_dir: PathBuf,
    pub file_name: String,
    /// TrueType font to use instead of the builtin Helvetica.
    pub font: Option<PathBuf>,
    pub print_preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_name: OUTPUT_FILE_NAME.to_string(),
            font: None,
            print_preview: false,
        }
    }
}

impl Config {
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}
