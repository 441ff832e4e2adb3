use clap::Parser;

use stepchain::api::Server;
use stepchain::backends::anthropic::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use stepchain::chain::MAX_RECORDED_STEPS;

/// Command line arguments for the stepchain server
#[derive(Parser)]
#[clap(
    name = "stepchain-server",
    about = "HTTP server for the chain-of-thought query service"
)]
struct CliArgs {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Model identifier sent with every completion request
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum output tokens per completion request
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Cap on answered reasoning steps per query
    #[arg(long, default_value_t = MAX_RECORDED_STEPS)]
    max_steps: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    stepchain::init_logging();

    let args = CliArgs::parse();

    let server = Server::new()
        .with_model(args.model)
        .with_max_tokens(args.max_tokens)
        .with_max_steps(args.max_steps);

    server.run(&args.addr).await?;
    Ok(())
}
