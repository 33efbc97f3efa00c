// Response detection for restfuzz
// Case-insensitive marker search with per-request deduplication

use std::sync::Arc;

use crate::models::Finding;
use crate::payloads::MarkerCatalog;
use crate::reporting::Reporter;

pub struct DetectionEngine {
    markers: MarkerCatalog,
    reporter: Arc<dyn Reporter>,
}

impl DetectionEngine {
    pub fn new(markers: MarkerCatalog, reporter: Arc<dyn Reporter>) -> Self {
        Self { markers, reporter }
    }

    /// Scan a response body and append new findings for `parameter`.
    ///
    /// A marker already recorded for the same parameter is skipped, so the
    /// first payload that exposes it wins. `findings` must belong to a single
    /// request definition.
    pub fn detect(&self, body: &str, parameter: &str, payload: &str, findings: &mut Vec<Finding>) {
        let haystack = body.to_lowercase();

        for marker in &self.markers.markers {
            if !haystack.contains(&marker.to_lowercase()) {
                continue;
            }

            let marker = marker.trim();
            let seen = findings
                .iter()
                .any(|f| f.parameter == parameter && f.marker == marker);
            if seen {
                continue;
            }

            let finding = Finding {
                parameter: parameter.to_string(),
                marker: marker.to_string(),
                payload: payload.to_string(),
            };
            self.reporter.finding(&finding);
            findings.push(finding);
        }
    }
}
