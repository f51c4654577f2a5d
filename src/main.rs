//! hwpdf CLI entrypoint.
//!
//! With `--folder`/`--files` the conversion runs here on the command line;
//! otherwise (or with `--gui`) the graphical converter is started.
//! For programmatic use, prefer the library API (`hwpdf::api`).

use std::process::ExitCode;

use clap::Parser;

mod cli;

fn main() -> ExitCode {
    let args = cli::CliArgs::parse();
    if !args.is_cli_mode() {
        return launch_gui();
    }

    match cli::run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "gui")]
fn launch_gui() -> ExitCode {
    match hwpdf::gui::launch() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to start the GUI: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "gui"))]
fn launch_gui() -> ExitCode {
    eprintln!("{}", cli::errors::AppError::GuiUnavailable);
    ExitCode::FAILURE
}
