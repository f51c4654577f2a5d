use clap::Parser;
use std::path::PathBuf;

use hwpdf::io::soffice::SOFFICE_ENV;

#[derive(Parser)]
#[command(
    name = "hwpdf",
    version,
    about = "Convert HWP/HWPX documents to PDF (CLI and GUI)",
    long_about = "Convert HWP/HWPX documents to PDF.\n\nWith --folder or --files the conversion runs on the command line; \
                  without them (or with --gui) the graphical converter opens."
)]
pub struct CliArgs {
    /// Folder to scan for .hwp/.hwpx files
    #[arg(short = 'd', long)]
    pub folder: Option<PathBuf>,

    /// Files to convert; relative paths are taken against --folder when given
    #[arg(short = 'f', long, num_args = 0..)]
    pub files: Vec<PathBuf>,

    /// Convert even when the PDF already exists
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Open the graphical converter even when inputs are given
    #[arg(long, default_value_t = false)]
    pub gui: bool,

    /// LibreOffice binary used for the conversion
    #[arg(long, env = SOFFICE_ENV)]
    pub engine: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, default_value_t = false)]
    pub log: bool,
}

impl CliArgs {
    /// Inputs were given and the GUI was not requested
    pub fn is_cli_mode(&self) -> bool {
        (self.folder.is_some() || !self.files.is_empty()) && !self.gui
    }
}
