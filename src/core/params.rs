use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::io::resolve_binary;
use crate::types::ExportFormat;

/// Conversion settings shared by the CLI and GUI, and saved as GUI presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionParams {
    /// Convert even when the output PDF already exists
    pub overwrite: bool,
    pub format: ExportFormat,
    /// Engine binary; None means `HWPDF_SOFFICE` or `soffice` on PATH
    pub engine: Option<PathBuf>,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            overwrite: false,
            format: ExportFormat::Pdf,
            engine: None,
        }
    }
}

impl ConversionParams {
    pub fn engine_binary(&self) -> PathBuf {
        resolve_binary(self.engine.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let params: ConversionParams = serde_json::from_str(r#"{ "overwrite": true }"#).unwrap();
        assert!(params.overwrite);
        assert_eq!(params.format, ExportFormat::Pdf);
        assert_eq!(params.engine, None);
    }
}
