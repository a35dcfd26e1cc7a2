//! Main entry point for the api-tester binary
//!
//! Loads the endpoint configuration, tests every endpoint with the real
//! identity provider and HTTP transport, prints the report and exits with
//! status 0 only when every endpoint passed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tokio::signal;

use api_tester::{
    cancel_pair, load_config,
    services::{ConsoleReporter, JsonReporter, RealApiInvoker, RealTokenAcquirer, DEFAULT_AUTHORITY_HOST},
    CancelSignal, Endpoint, EndpointTester, Reporter, RunReport, StageDeadlines, TestRun, TesterResult,
    DEFAULT_CONFIG_PATH,
};
use shared::{logging, run_debug, run_error, RunId};

type Tester = EndpointTester<RealTokenAcquirer, RealApiInvoker>;

/// Report format written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Checks that OAuth 2.0 client-credentials protected API endpoints are reachable
#[derive(Parser)]
#[command(name = "api-tester")]
#[command(about = "Authenticates, calls and classifies every configured API endpoint")]
pub struct Args {
    /// Endpoint configuration file
    #[arg(long, env = "API_TESTER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Print stage transitions and unexpected response bodies
    #[arg(short, long)]
    pub verbose: bool,

    /// Deadline for token acquisition, in seconds
    #[arg(long, default_value = "30")]
    pub auth_timeout_secs: u64,

    /// Deadline for the endpoint call, in seconds
    #[arg(long, default_value = "30")]
    pub request_timeout_secs: u64,

    /// Identity provider authority host used for bare tenant ids
    #[arg(long, env = "API_TESTER_AUTHORITY_HOST", default_value = DEFAULT_AUTHORITY_HOST)]
    pub authority_host: String,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));

    match run(args).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<u8> {
    let endpoints = load_config(&args.config).context("Failed to load configuration")?;

    let run_id = RunId::new();
    run_debug!(
        run_id,
        config = %args.config.display(),
        authority_host = %args.authority_host,
        "Loaded {} endpoint(s)",
        endpoints.len()
    );

    let deadlines = StageDeadlines {
        auth: Duration::from_secs(args.auth_timeout_secs),
        request: Duration::from_secs(args.request_timeout_secs),
    };
    let tester = EndpointTester::new(
        RealTokenAcquirer::with_authority_host(args.authority_host)?,
        RealApiInvoker::new()?,
    )
    .with_deadlines(deadlines)
    .with_verbose(args.verbose);

    // Ctrl+C aborts the in-flight stage and the run
    let (cancel_handle, cancel) = cancel_pair();
    let signal_run_id = run_id.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                logging::log_shutdown(&signal_run_id, "Received Ctrl+C signal");
                cancel_handle.cancel();
            }
            Err(err) => {
                logging::log_error(&signal_run_id, "Signal handling", &err);
            }
        }
    });

    let result = match args.output {
        OutputFormat::Text => execute(run_id.clone(), tester, ConsoleReporter::stdout(), &endpoints, &cancel).await,
        OutputFormat::Json => execute(run_id.clone(), tester, JsonReporter::stdout(), &endpoints, &cancel).await,
    };

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            run_error!(run_id, error = %err, "Run did not complete");
            return Err(err.into());
        }
    };

    if report.has_failures() {
        logging::log_progress(
            &run_id,
            "Run finished",
            &format!("{} of {} endpoint(s) failed", report.summary.failed, report.summary.total),
        );
    } else {
        logging::log_success(&run_id, "All endpoints passed");
    }

    Ok(report.exit_code())
}

async fn execute<R: Reporter>(
    run_id: RunId,
    tester: Tester,
    reporter: R,
    endpoints: &[Endpoint],
    cancel: &CancelSignal,
) -> TesterResult<RunReport> {
    TestRun::with_run_id(run_id, tester, reporter)
        .execute(endpoints, cancel)
        .await
}
