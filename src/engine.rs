// Async HTTP fuzzing engine for restfuzz
// Sends one request per (parameter, payload) and analyses responses concurrently

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Request};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::detection::DetectionEngine;
use crate::error::FuzzError;
use crate::models::{Finding, RequestDefinition};
use crate::parameters::{extract_paths, mutate, ParameterPath};
use crate::payloads::{MarkerCatalog, PayloadCatalog};
use crate::reporting::{Progress, Reporter, Spinner};

/// Outcome of one fuzzing pass over a single request definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// The request had no body fields to inject into
    pub skipped: bool,
    pub parameters: usize,
    pub requests_sent: usize,
    /// Parameters whose payload loop stopped on a build or transport error
    pub aborted_parameters: usize,
    pub findings: usize,
}

/// Totals over a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub requests: usize,
    pub skipped_requests: usize,
    pub requests_sent: usize,
    pub aborted_parameters: usize,
    pub findings: usize,
}

impl RunSummary {
    fn add(&mut self, pass: &PassSummary) {
        self.requests += 1;
        if pass.skipped {
            self.skipped_requests += 1;
        }
        self.requests_sent += pass.requests_sent;
        self.aborted_parameters += pass.aborted_parameters;
        self.findings += pass.findings;
    }
}

pub struct FuzzEngine {
    pub client: Client,
    payloads: PayloadCatalog,
    detector: Arc<DetectionEngine>,
    reporter: Arc<dyn Reporter>,
}

impl FuzzEngine {
    /// The client has no request timeout: a target that never answers
    /// stalls the run.
    pub fn new(
        payloads: PayloadCatalog,
        markers: MarkerCatalog,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, FuzzError> {
        let client = Client::builder().pool_max_idle_per_host(10).build()?;
        Ok(Self {
            client,
            payloads,
            detector: Arc::new(DetectionEngine::new(markers, Arc::clone(&reporter))),
            reporter,
        })
    }

    /// Fuzz every request in order, one at a time.
    pub async fn run(&self, requests: &mut [RequestDefinition]) -> RunSummary {
        info!("Fuzzing started");
        let mut summary = RunSummary::default();
        for request in requests.iter_mut() {
            let pass = self.fuzz_request(request).await;
            summary.add(&pass);
        }
        info!(
            requests_sent = summary.requests_sent,
            findings = summary.findings,
            "Fuzzing finish."
        );
        summary
    }

    /// Run the parameter × payload loop for one request.
    ///
    /// Findings are appended to `request.findings`. Every detection task
    /// spawned during the pass has completed when this returns.
    pub async fn fuzz_request(&self, request: &mut RequestDefinition) -> PassSummary {
        let mut summary = PassSummary::default();

        let (body, paths) = match &request.body {
            Some(body) if request.has_fuzzable_body() => (body.clone(), extract_paths(body)),
            _ => (Value::Null, Vec::new()),
        };
        if paths.is_empty() {
            self.reporter.request_started(request, None);
            self.reporter.no_data(request);
            self.reporter.request_finished(request);
            summary.skipped = true;
            return summary;
        }

        let rendered = serde_json::to_string(&body).ok();
        self.reporter.request_started(request, rendered.as_deref());

        summary.parameters = paths.len();
        let before = request.findings.len();
        let findings = Arc::new(Mutex::new(std::mem::take(&mut request.findings)));
        let mut detections = JoinSet::new();

        for path in &paths {
            let outcome = self
                .fuzz_parameter(request, &body, path, &findings, &mut detections)
                .await;
            summary.requests_sent += outcome.sent;
            if outcome.aborted {
                summary.aborted_parameters += 1;
            }
        }

        while let Some(joined) = detections.join_next().await {
            if let Err(e) = joined {
                warn!("Detection task failed: {}", e);
            }
        }

        request.findings = std::mem::take(&mut *findings.lock().await);
        summary.findings = request.findings.len() - before;

        self.reporter.request_finished(request);
        summary
    }

    async fn fuzz_parameter(
        &self,
        request: &RequestDefinition,
        body: &Value,
        path: &ParameterPath,
        findings: &Arc<Mutex<Vec<Finding>>>,
        detections: &mut JoinSet<()>,
    ) -> ParameterOutcome {
        let mut outcome = ParameterOutcome::default();
        let address = path.address();
        let total = self.payloads.len();
        let mut spinner = Spinner::new();

        for (index, payload) in self.payloads.payloads.iter().enumerate() {
            let frame = spinner.tick();

            let (status, wire_body, response_body) =
                match self.send(request, body, path, payload).await {
                    Ok(sent) => sent,
                    Err(e) => {
                        warn!(parameter = %address, "Stopping payloads for parameter: {}", e);
                        self.reporter.transport_error(&address, &e);
                        outcome.aborted = true;
                        break;
                    }
                };
            outcome.sent += 1;

            self.reporter.progress(&Progress {
                parameter: &address,
                current: index + 1,
                total,
                spinner: frame,
                status,
                body: &wire_body,
            });

            let detector = Arc::clone(&self.detector);
            let findings = Arc::clone(findings);
            let parameter = address.clone();
            let payload = payload.clone();
            detections.spawn(async move {
                let mut findings = findings.lock().await;
                detector.detect(&response_body, &parameter, &payload, &mut findings);
            });
        }

        outcome
    }

    /// Build and send one mutated request. Returns the status, the body that
    /// was sent and the response text.
    async fn send(
        &self,
        request: &RequestDefinition,
        body: &Value,
        path: &ParameterPath,
        payload: &str,
    ) -> Result<(u16, String, String), FuzzError> {
        let wire_body = mutate(body, path, payload)?;
        let http_request = self.build_request(request, wire_body.clone())?;

        debug!(method = %http_request.method(), url = %http_request.url(), "Sending payload");
        let response = self.client.execute(http_request).await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok((status, wire_body, text))
    }

    /// Method, URL and declared headers of `request` with `body` attached.
    /// No content type is added beyond what the collection declares.
    pub fn build_request(
        &self,
        request: &RequestDefinition,
        body: String,
    ) -> Result<Request, FuzzError> {
        let method = parse_method(&request.method)?;
        let headers = build_headers(&request.headers)?;
        Ok(self
            .client
            .request(method, &request.url)
            .headers(headers)
            .body(body)
            .build()?)
    }
}

#[derive(Debug, Default)]
struct ParameterOutcome {
    sent: usize,
    aborted: bool,
}

fn parse_method(method: &str) -> Result<Method, FuzzError> {
    Method::from_bytes(method.trim().to_uppercase().as_bytes()).map_err(|_| {
        FuzzError::InvalidMethod {
            method: method.to_string(),
        }
    })
}

fn build_headers(headers: &BTreeMap<String, String>) -> Result<HeaderMap, FuzzError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let invalid = || FuzzError::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_bytes(value.as_bytes()).map_err(|_| invalid())?;
        if map.contains_key(&header_name) {
            warn!(header = %name, "Header declared more than once, sending every value");
        }
        map.append(header_name, header_value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_is_case_insensitive() {
        assert_eq!(parse_method("post").unwrap(), Method::POST);
        assert_eq!(parse_method(" Patch ").unwrap(), Method::PATCH);
        assert_eq!(parse_method("PROPFIND").unwrap().as_str(), "PROPFIND");
    }

    #[test]
    fn invalid_method_is_rejected() {
        assert!(matches!(
            parse_method("GE T"),
            Err(FuzzError::InvalidMethod { .. })
        ));
    }

    #[test]
    fn invalid_header_is_rejected() {
        let mut headers = BTreeMap::new();
        headers.insert("Bad Header".to_string(), "x".to_string());
        assert!(matches!(
            build_headers(&headers),
            Err(FuzzError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn non_ascii_header_value_is_sent() {
        let mut headers = BTreeMap::new();
        headers.insert("X-User".to_string(), "Zoë".to_string());
        let map = build_headers(&headers).unwrap();
        assert_eq!(map.get("x-user").unwrap().as_bytes(), "Zoë".as_bytes());
    }

    #[test]
    fn headers_differing_in_case_are_both_kept() {
        let mut headers = BTreeMap::new();
        headers.insert("X-A".to_string(), "1".to_string());
        headers.insert("x-a".to_string(), "2".to_string());
        let map = build_headers(&headers).unwrap();
        let values: Vec<&[u8]> = map.get_all("x-a").iter().map(|v| v.as_bytes()).collect();
        assert_eq!(values, vec![b"1".as_slice(), b"2".as_slice()]);
    }

    #[test]
    fn run_summary_accumulates_passes() {
        let mut summary = RunSummary::default();
        summary.add(&PassSummary {
            skipped: true,
            ..Default::default()
        });
        summary.add(&PassSummary {
            parameters: 2,
            requests_sent: 6,
            aborted_parameters: 1,
            findings: 2,
            ..Default::default()
        });
        assert_eq!(
            summary,
            RunSummary {
                requests: 2,
                skipped_requests: 1,
                requests_sent: 6,
                aborted_parameters: 1,
                findings: 2,
            }
        );
    }
}
