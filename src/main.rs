use std::sync::Arc;

use airtable_mcp::{AirtableClient, ToolDispatcher};
use airtable_mcp_server::{
    config::{ServerArgs, PAT_ENV},
    logging::init_logging,
    server::{
        http::serve_http,
        preflight,
        session::{SessionStore, SWEEP_INTERVAL},
        stdio::serve_stdio,
        McpServer,
    },
};
use clap::Parser;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_logging(&args.log_level, args.log_json);

    if let Err(e) = run(args).await {
        error!(error = %e, "Fatal error");
        return Err(e);
    }
    Ok(())
}

async fn run(args: ServerArgs) -> anyhow::Result<()> {
    if args.uses_positional_key() {
        warn!(
            "Passing in an API key as a command-line argument is deprecated and may be removed \
             in a future version. Instead, set the `AIRTABLE_API_KEY` environment variable."
        );
    }

    let config = args.gateway_config(std::env::var(PAT_ENV).ok())?;
    let client = Arc::new(AirtableClient::new(config)?);
    info!("Starting Airtable MCP Server");

    if args.skip_preflight {
        info!("Preflight checks skipped");
    } else if let Err(e) = preflight(client.as_ref()).await {
        error!(error = %e, "Preflight checks failed");
        return Err(e.into());
    }

    let metrics = Arc::clone(client.metrics());
    let dispatcher = ToolDispatcher::new(client).with_metrics(metrics);
    let server = McpServer::new(Arc::new(dispatcher));

    let Some(http) = args.http_options() else {
        return serve_stdio(server).await;
    };

    let sessions = Arc::new(SessionStore::new());
    let sweeper = Arc::clone(&sessions).spawn_sweeper(SWEEP_INTERVAL);
    let http_task = tokio::spawn(serve_http(server.clone(), sessions, http));

    if args.runs_stdio() {
        serve_stdio(server).await?;
    } else {
        info!("stdio transport disabled (set STDIO_MODE=1 to enable)");
    }

    let outcome = http_task.await;
    sweeper.abort();
    outcome?
}
