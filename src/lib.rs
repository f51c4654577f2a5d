#![doc = r#"
hwpdf: batch conversion of HWP/HWPX documents to PDF.

The conversion itself is done by an external document engine; this crate
decides which files to convert, drives the engine one file at a time, and
reports progress and per-file results to a front end. It powers both the
`hwpdf` CLI and the `hwpdfUI` GUI, and can be embedded in your own tools.

Requirements
------------
- LibreOffice (`soffice`) on `PATH`, or its location in `HWPDF_SOFFICE`.
  LibreOffice only imports legacy `.hwp` files. `.hwpx` inputs are still
  picked up and handed to the engine, but stock LibreOffice rejects them, so
  they show up as per-file failures.
- Rust 2024 edition toolchain.

Quick start: convert a folder
-----------------------------
```rust,no_run
use std::path::Path;
use hwpdf::{CancelToken, ConversionParams, RunObserver, RunState, convert_paths};

struct Print;

impl RunObserver for Print {
    fn log(&self, line: &str) { println!("{line}"); }
    fn progress(&self, percent: u8) { eprintln!("{percent}%"); }
    fn finished(&self, state: RunState) { eprintln!("finished: {state:?}"); }
}

fn main() -> hwpdf::Result<()> {
    let params = ConversionParams { overwrite: true, ..Default::default() };
    let report = convert_paths(
        Some(Path::new("/data/documents")),
        &[],
        &params,
        CancelToken::new(),
        &Print,
    )?;
    println!("{report}");
    Ok(())
}
```

Bring your own engine
---------------------
The runner only sees the [`DocumentEngine`] trait, so another converter (or a
fake one in tests) can be injected through any `Fn() -> Result<E, EngineError>`:

```rust
use std::path::{Path, PathBuf};
use hwpdf::{BatchRunner, ConversionJob, DocumentEngine, EngineError, ExportFormat};
use hwpdf::{RunObserver, RunState};

struct Noop;

impl DocumentEngine for Noop {
    fn open(&mut self, _: &Path) -> Result<(), EngineError> { Ok(()) }
    fn save_as(&mut self, _: &Path, _: ExportFormat) -> Result<(), EngineError> { Ok(()) }
    fn quit(&mut self) -> Result<(), EngineError> { Ok(()) }
}

struct Quiet;

impl RunObserver for Quiet {
    fn log(&self, _: &str) {}
    fn progress(&self, _: u8) {}
    fn finished(&self, _: RunState) {}
}

let mut runner = BatchRunner::new(|| Ok::<_, EngineError>(Noop));
let job = ConversionJob::new(vec![PathBuf::from("/docs/a.hwp")]);
assert_eq!(runner.run(job, &Quiet).unwrap(), RunState::Completed);
```

Cancellation
------------
Hand a clone of a [`CancelToken`] to the UI thread and call `cancel()`; the
runner stops before the next file. A file that is being converted is never
interrupted.

Feature flags
-------------
- `gui`: builds the GUI module and the `hwpdfUI` binary.
- `full`: enables everything.

Useful modules
--------------
- [`api`]: plan-and-run entry points and `BatchReport`.
- [`core`]: discovery, jobs, the runner and the observer boundary.
- [`io`]: the `DocumentEngine` trait and the LibreOffice engine.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// GUI module (only available with gui feature)
#[cfg(feature = "gui")]
pub mod gui;

// Curated public API surface
pub use core::discovery::{EmptyReason, JobPlan};
pub use core::job::{CancelToken, ConversionJob};
pub use core::observer::{ChannelObserver, RunEvent, RunObserver};
pub use core::params::ConversionParams;
pub use core::runner::BatchRunner;
pub use error::{Error, Result};
pub use types::{ConversionOutcome, ExportFormat, OutcomeStatus, RunState};

// Engines
pub use io::{DocumentEngine, EngineError, EngineProvider, SofficeEngine, SofficeProvider};

// High-level API re-exports
pub use api::{BatchReport, convert_paths, plan_job, run_plan};
