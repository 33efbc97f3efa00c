// Main CLI entry point for restfuzz
// Uses clap for argument parsing

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use restfuzz::config::FuzzConfig;
use restfuzz::engine::FuzzEngine;
use restfuzz::payloads::VulnType;
use restfuzz::reporting::ConsoleReporter;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("restfuzz")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Jake Abendroth")
        .about("Payload injection fuzzer for JSON-bodied REST APIs")
        .after_help("EXAMPLES:\n  restfuzz -r requests.json -t sql\n  restfuzz -r export.json -p -t xss -v\n  restfuzz -r requests.json -c payloads.txt -m markers.txt")
        .arg(Arg::new("requests")
            .short('r')
            .long("requests")
            .required(true)
            .num_args(1)
            .help("File to API requests dump"))
        .arg(Arg::new("type")
            .short('t')
            .long("type")
            .num_args(1)
            .value_parser(["sql", "xss", "python"])
            .help("Type of fuzzing: sql, xss, python"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(clap::ArgAction::SetTrue)
            .help("Print payload verbose in checking process"))
        .arg(Arg::new("custom")
            .short('c')
            .long("custom")
            .num_args(1)
            .help("Custom payload file"))
        .arg(Arg::new("markers")
            .short('m')
            .long("markers")
            .num_args(1)
            .help("Custom marker file"))
        .arg(Arg::new("postman")
            .short('p')
            .long("postman")
            .action(clap::ArgAction::SetTrue)
            .help("Use postman format"))
}

fn config_from_matches(matches: &ArgMatches) -> anyhow::Result<FuzzConfig> {
    let vuln_type = matches
        .get_one::<String>("type")
        .map(|t| t.parse::<VulnType>())
        .transpose()?;

    Ok(FuzzConfig {
        target: matches.get_one::<String>("requests").cloned().unwrap_or_default(),
        vuln_type,
        custom_payload: matches.get_one::<String>("custom").map(PathBuf::from),
        custom_markers: matches.get_one::<String>("markers").map(PathBuf::from),
        verbose: matches.get_flag("verbose"),
        postman: matches.get_flag("postman"),
    })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "restfuzz=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: FuzzConfig) -> anyhow::Result<()> {
    info!("Running restfuzz [v{}] ...", env!("CARGO_PKG_VERSION"));

    let payloads = config.load_payloads().context("Failed to load payloads")?;
    let markers = config.load_markers().context("Failed to load markers")?;
    info!(
        payloads = payloads.len(),
        markers = markers.len(),
        "Loaded catalogs `{}` / `{}`",
        payloads.name,
        markers.name
    );

    let mut requests = config.load_requests()?;

    let reporter = Arc::new(ConsoleReporter::new(config.verbose));
    let engine = FuzzEngine::new(payloads, markers, reporter)
        .context("Failed to build HTTP client")?;
    let summary = engine.run(&mut requests).await;

    info!(
        requests = summary.requests,
        skipped = summary.skipped_requests,
        sent = summary.requests_sent,
        aborted_parameters = summary.aborted_parameters,
        findings = summary.findings,
        "Run complete"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let config = config_from_matches(&matches).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    if let Err(e) = config.validate() {
        eprintln!("error: {}", e);
        std::process::exit(2);
    }

    init_tracing(config.verbose);

    if let Err(e) = run(config).await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn parses_all_flags() {
        let matches = cli()
            .try_get_matches_from([
                "restfuzz", "-r", "req.json", "-t", "sql", "-v", "-c", "p.txt", "-m", "m.txt", "-p",
            ])
            .unwrap();
        let config = config_from_matches(&matches).unwrap();
        assert_eq!(config.target, "req.json");
        assert_eq!(config.vuln_type, Some(VulnType::Sql));
        assert_eq!(config.custom_payload, Some(PathBuf::from("p.txt")));
        assert_eq!(config.custom_markers, Some(PathBuf::from("m.txt")));
        assert!(config.verbose);
        assert!(config.postman);
    }

    #[test]
    fn requests_flag_is_required() {
        assert!(cli().try_get_matches_from(["restfuzz", "-t", "sql"]).is_err());
    }

    #[test]
    fn missing_type_and_custom_fails_validation() {
        let matches = cli().try_get_matches_from(["restfuzz", "-r", "req.json"]).unwrap();
        let config = config_from_matches(&matches).unwrap();
        assert!(config.validate().is_err());
    }
}
