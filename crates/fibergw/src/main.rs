mod exit;
mod logging;

use std::io::{Read, Write};
use std::time::Duration;

use clap::Parser;
use tracing::info;

use fibergw_core::{error_envelope, Gateway, GatewayConfig, Request};
use fibergw_transport::LocalClient;

use crate::exit::{io_error, CliResult, SUCCESS};
use crate::logging::{init_logging, LogFormat, LogLevel};

/// Gateway shell: reads one JSON request from stdin, dispatches it to the
/// local Fiber services, and writes the response body to stdout. Invoked
/// once per inbound web call by the HTTP front end.
#[derive(Parser, Debug)]
#[command(name = "fibergw", version, about = "Fiber web gateway")]
struct Cli {
    /// Address of the web client, as seen by the HTTP front end.
    #[arg(long, value_name = "ADDR", env = "REMOTE_ADDR", default_value = "unknown")]
    client_ip: String,

    /// Override the control channel address.
    #[arg(long, value_name = "ENDPOINT")]
    control: Option<String>,

    /// Read deadline for transport round-trips, in seconds.
    /// Absent means block until the peer hangs up.
    #[arg(long, value_name = "SECONDS")]
    read_timeout: Option<u64>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

fn run(cli: &Cli) -> CliResult<i32> {
    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .map_err(|err| io_error("failed reading request body", err))?;

    info!("Request initiated from : {}", cli.client_ip);

    let response = respond(cli, &body);

    let mut stdout = std::io::stdout();
    stdout
        .write_all(&response)
        .and_then(|()| stdout.flush())
        .map_err(|err| io_error("failed writing response body", err))?;

    info!("Response sent to : {}", cli.client_ip);
    Ok(SUCCESS)
}

/// Produce exactly one response body for the inbound bytes.
fn respond(cli: &Cli, body: &str) -> Vec<u8> {
    // Only a completely absent body counts as an illegal attempt; a
    // present-but-blank body falls through to the JSON parse below.
    if body.is_empty() {
        info!("Illegal attempt to contact Fiber by {}", cli.client_ip);
        return error_envelope("Illegal attempt to contact Fiber. This will be reported!")
            .into_bytes();
    }

    let mut request = match Request::from_json_str(body) {
        Ok(request) => request,
        Err(_) => {
            info!("Invalid data from {} : {body}", cli.client_ip);
            return error_envelope("Invalid request message format. Expected JSON.").into_bytes();
        }
    };
    request.set_client_ip(cli.client_ip.clone());

    let mut config = GatewayConfig::default();
    if let Some(control) = &cli.control {
        config.control_endpoint = control.clone();
    }

    let transport =
        LocalClient::new().with_read_timeout(cli.read_timeout.map(Duration::from_secs));
    let mut gateway = Gateway::new(transport, config);
    gateway.dispatch(&request)
}
