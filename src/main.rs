//! `resolve`: run one HTTP request through the response resolver.
//!
//! ```text
//! resolve https://api.example.com/v1/users/1 --expect json --retries 2 --retry-on 503
//! ```
//!
//! Prints the decoded value on success, the classified failure otherwise,
//! and exits non-zero on failure.

use clap::{Parser, ValueEnum};
use reqwest::Method;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

use response_resolver::config::{load_config, ClientConfig};
use response_resolver::decode::{NoContent, ResponseValue};
use response_resolver::http::{Client, ReqwestTransport, Request, RequestDescriptor, StatusCode};
use response_resolver::lifecycle::{ClientContext, RequestHandle};
use response_resolver::observability::logging;
use response_resolver::resilience::RetryPolicy;
use response_resolver::resolver::{Resolution, TokioScheduler};

#[derive(Parser)]
#[command(name = "resolve")]
#[command(about = "Send one HTTP request and resolve its response", long_about = None)]
struct Cli {
    /// Target URL
    url: String,

    #[arg(short, long, default_value = "GET")]
    method: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expected result type
    #[arg(short, long, value_enum, default_value_t = Expect::Json)]
    expect: Expect,

    /// Maximum number of retries
    #[arg(long)]
    retries: Option<u32>,

    /// Status codes or category names that trigger a retry
    #[arg(long = "retry-on", num_args = 1..)]
    retry_on: Vec<StatusCode>,

    /// Minimum latency of a successful response, in milliseconds
    #[arg(long)]
    additional_timeout_ms: Option<u64>,

    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Expect {
    None,
    Raw,
    Bool,
    Int,
    Float,
    String,
    Json,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    logging::init(cli.log_level.as_deref().unwrap_or(&config.observability.log_level));

    let method = Method::from_bytes(cli.method.to_uppercase().as_bytes())?;
    let mut descriptor = RequestDescriptor::from_config(method, Url::parse(&cli.url)?, &config);
    if let Some(ms) = cli.additional_timeout_ms {
        descriptor = descriptor.additional_timeout(std::time::Duration::from_millis(ms));
    }
    if cli.retries.is_some() || !cli.retry_on.is_empty() {
        let max_attempts = cli.retries.unwrap_or(config.retries.max_attempts);
        let retry_on = if cli.retry_on.is_empty() {
            config.retries.retry_on.clone()
        } else {
            cli.retry_on.clone()
        };
        descriptor = descriptor.retry(RetryPolicy::new(max_attempts, retry_on));
    }

    let scheduler = TokioScheduler::current().ok_or("no Tokio runtime")?;
    let client = Client::new(
        ReqwestTransport::new(),
        Arc::new(ClientContext::from_config(&config)),
        scheduler,
    );

    let outcome = match cli.expect {
        Expect::None => run::<NoContent>(&client, descriptor, |_| "no content".to_string()).await,
        Expect::Raw => run::<Vec<u8>>(&client, descriptor, |b| String::from_utf8_lossy(&b).into_owned()).await,
        Expect::Bool => run::<bool>(&client, descriptor, |v| v.to_string()).await,
        Expect::Int => run::<i64>(&client, descriptor, |v| v.to_string()).await,
        Expect::Float => run::<f64>(&client, descriptor, |v| v.to_string()).await,
        Expect::String => run::<String>(&client, descriptor, |v| v).await,
        Expect::Json => {
            run::<serde_json::Value>(&client, descriptor, |v| {
                serde_json::to_string_pretty(&v).unwrap_or_else(|_| v.to_string())
            })
            .await
        }
    };
    client.context().teardown();

    match outcome {
        Ok(text) => {
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Err(text) => {
            eprintln!("Error: {}", text);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Execute one request and wait for its terminal callback.
async fn run<T: ResponseValue>(
    client: &Client<ReqwestTransport, TokioScheduler>,
    descriptor: RequestDescriptor,
    render: fn(T) -> String,
) -> Result<String, String> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (ok_tx, err_tx) = (tx.clone(), tx);
    let request = Request::<T>::new(descriptor)
        .on_success(move |value| {
            let _ = ok_tx.send(Ok(render(value)));
        })
        .on_error(move |error| {
            let mut text = error.to_string();
            if let Some(cause) = &error.cause {
                text.push_str(&format!(" ({})", cause));
            }
            let _ = err_tx.send(Err(text));
        });

    let handle = RequestHandle::new();
    match client.execute(&request, &handle).await {
        Resolution::Cancelled => return Err("request cancelled".to_string()),
        resolution => tracing::debug!(resolution = ?resolution, "Waiting for delivery"),
    }
    drop(request);

    rx.recv()
        .await
        .unwrap_or_else(|| Err("request finished without a result".to_string()))
}
