//! vmlease - lease test VMs from a pooling service and hand them back

use clap::Parser;

use vmlease_cli::cli::Cli;
use vmlease_cli::infra::logging::init_tracing;
use vmlease_cli::output::json::{error_code, format_error};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;
    if let Err(e) = cli.run().await {
        match format_error(&format!("{e:#}"), error_code(&e)) {
            Ok(body) if json => println!("{body}"),
            _ => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}
