//! I/O layer: the `DocumentEngine` boundary to the external converter and
//! the LibreOffice (`soffice`) implementation of it.
pub mod engine;
pub use engine::{DocumentEngine, EngineError, EngineProvider};

pub mod soffice;
pub use soffice::{SofficeEngine, SofficeProvider, resolve_binary};
