use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use hwpdf::{BatchReport, CancelToken, ConversionParams, RunObserver, RunState, convert_paths};

use super::args::CliArgs;
use super::errors::AppError;

/// Prints run log lines to stdout; progress goes to the debug log
struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn log(&self, line: &str) {
        println!("{}", line);
    }

    fn progress(&self, percent: u8) {
        debug!("Progress: {}%", percent);
    }

    fn finished(&self, state: RunState) {
        debug!("Run finished: {:?}", state);
    }
}

fn init_logging(enabled: bool) {
    if enabled {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

pub fn run(args: CliArgs) -> Result<BatchReport, AppError> {
    init_logging(args.log);

    if let Some(folder) = &args.folder {
        if !folder.is_dir() {
            return Err(AppError::InvalidFolder(folder.clone()));
        }
    }

    let params = ConversionParams {
        overwrite: args.overwrite,
        engine: args.engine.clone(),
        ..Default::default()
    };
    info!(
        "Starting conversion: folder={:?}, files={}, overwrite={}",
        args.folder,
        args.files.len(),
        params.overwrite
    );

    let report = convert_paths(
        args.folder.as_deref(),
        &args.files,
        &params,
        CancelToken::new(),
        &ConsoleObserver,
    )?;

    println!("Done: {}", report);
    Ok(report)
}
