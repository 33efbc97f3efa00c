// Run configuration for restfuzz
// Built from the command line and checked before any file is touched

use std::path::PathBuf;
use tracing::info;

use crate::error::FuzzError;
use crate::models::{CollectionParser, RequestDefinition};
use crate::parsers::{NativeParser, PostmanParser};
use crate::payloads::{MarkerCatalog, PayloadCatalog, VulnType};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuzzConfig {
    /// Request collection file
    pub target: String,
    pub vuln_type: Option<VulnType>,
    /// Replaces the built-in payloads when set
    pub custom_payload: Option<PathBuf>,
    /// Replaces the marker catalog when set
    pub custom_markers: Option<PathBuf>,
    pub verbose: bool,
    /// Read `target` as a Postman-style export
    pub postman: bool,
}

impl FuzzConfig {
    /// A run needs a vulnerability type or a custom payload file.
    pub fn validate(&self) -> Result<(), FuzzError> {
        if self.vuln_type.is_none() && self.custom_payload.is_none() {
            return Err(FuzzError::MissingFuzzType);
        }
        Ok(())
    }

    pub fn load_payloads(&self) -> Result<PayloadCatalog, FuzzError> {
        match (&self.custom_payload, self.vuln_type) {
            (Some(path), _) => PayloadCatalog::from_file(path),
            (None, Some(vuln)) => Ok(PayloadCatalog::builtin(vuln)),
            (None, None) => Err(FuzzError::MissingFuzzType),
        }
    }

    /// Custom marker file, else the type's markers, else every built-in marker.
    pub fn load_markers(&self) -> Result<MarkerCatalog, FuzzError> {
        match (&self.custom_markers, self.vuln_type) {
            (Some(path), _) => MarkerCatalog::from_file(path),
            (None, Some(vuln)) => Ok(MarkerCatalog::builtin(vuln)),
            (None, None) => Ok(MarkerCatalog::all_builtin()),
        }
    }

    pub fn parser(&self) -> Box<dyn CollectionParser> {
        if self.postman {
            Box::new(PostmanParser)
        } else {
            Box::new(NativeParser)
        }
    }

    pub fn load_requests(&self) -> Result<Vec<RequestDefinition>, FuzzError> {
        info!("Loading a request file...");
        let requests = self.parser().parse(&self.target)?;
        info!("{} requests object loaded.", requests.len());
        Ok(requests)
    }
}
