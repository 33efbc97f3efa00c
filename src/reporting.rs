// Reporting and output for restfuzz
// Line-oriented console output per request, per payload and per finding

use colored::Colorize;
use std::io::Write;

use crate::error::FuzzError;
use crate::models::{Finding, RequestDefinition};

/// One payload send, as shown on the progress line
#[derive(Debug, Clone)]
pub struct Progress<'a> {
    pub parameter: &'a str,
    /// 1-based index of the payload within the catalog
    pub current: usize,
    pub total: usize,
    pub spinner: char,
    pub status: u16,
    pub body: &'a str,
}

/// Sink for fuzzing events. Called from the dispatch loop and from
/// detection tasks, so implementations must be thread-safe.
pub trait Reporter: Send + Sync {
    fn request_started(&self, request: &RequestDefinition, body: Option<&str>);
    fn no_data(&self, request: &RequestDefinition);
    fn progress(&self, progress: &Progress<'_>);
    fn transport_error(&self, parameter: &str, error: &FuzzError);
    fn finding(&self, finding: &Finding);
    fn request_finished(&self, request: &RequestDefinition);
}

/// Progress indicator cycling `-`, `/`, `\`
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    index: usize,
}

impl Spinner {
    const FRAMES: [char; 3] = ['-', '/', '\\'];

    pub fn new() -> Self {
        Self::default()
    }

    /// Advance and return the new frame
    pub fn tick(&mut self) -> char {
        self.index = (self.index + 1) % Self::FRAMES.len();
        Self::FRAMES[self.index]
    }
}

/// Writes the run to stdout
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter {
    /// Show the response status and mutated body instead of the spinner
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

// \x1b[2K clears the current line so progress overwrites itself
const CLEAR_LINE: &str = "\x1b[2K\r";

impl Reporter for ConsoleReporter {
    fn request_started(&self, request: &RequestDefinition, body: Option<&str>) {
        println!("-----------");
        println!("| {}", format!("{} {}", request.method, request.url).yellow());
        for (name, value) in &request.headers {
            println!("| {} : {}", name, value);
        }
        if let Some(body) = body {
            println!("| {}", body);
        }
    }

    fn no_data(&self, _request: &RequestDefinition) {
        println!("| No data found");
    }

    fn progress(&self, progress: &Progress<'_>) {
        if self.verbose {
            print!("|{}| [{}] : {}", CLEAR_LINE, progress.status, progress.body);
        } else {
            print!(
                "|{}| Checking payloads for parameter {} ({}/{}) {}",
                CLEAR_LINE, progress.parameter, progress.current, progress.total, progress.spinner
            );
        }
        let _ = std::io::stdout().flush();
    }

    fn transport_error(&self, parameter: &str, error: &FuzzError) {
        println!("{}| {} ({})", CLEAR_LINE, error.to_string().red(), parameter);
    }

    fn finding(&self, finding: &Finding) {
        println!(
            "{}",
            format!("{}| Results found in {}", CLEAR_LINE, finding).green()
        );
    }

    fn request_finished(&self, _request: &RequestDefinition) {
        print!("|{}", CLEAR_LINE);
        println!("-----------");
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn request_started(&self, _request: &RequestDefinition, _body: Option<&str>) {}
    fn no_data(&self, _request: &RequestDefinition) {}
    fn progress(&self, _progress: &Progress<'_>) {}
    fn transport_error(&self, _parameter: &str, _error: &FuzzError) {}
    fn finding(&self, _finding: &Finding) {}
    fn request_finished(&self, _request: &RequestDefinition) {}
}
