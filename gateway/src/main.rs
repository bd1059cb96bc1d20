mod cli;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use common::{get_env_usize, ConfigLoader};
use dotenv::dotenv;
use env_logger::Env;
use gateway::{router, Gateway, GatewayOptions, MctsSearch};
use gomoku::ModelFactory;
use log::{info, warn};

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut builder = tokio::runtime::Builder::new_multi_thread();

    builder.enable_all();

    if let Some(worker_threads) = get_env_usize("TOKIO_THREADS")? {
        builder.worker_threads(worker_threads);
    }

    info!("{:?}", builder);

    builder
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(async_main())?;

    Ok(())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new_or_empty(&cli.config, "gateway".to_string())?;
    let options: GatewayOptions = config.load()?;
    let addrs = options.socket_addrs().await?;

    if options.api_token.is_none() {
        warn!("API_TOKEN is not set, all routes are open");
    }

    info!(
        "Serving {:?} for a {}x{} board, {} in a row, {} playouts",
        options.model_file,
        options.board.height,
        options.board.width,
        options.board.n_in_row,
        options.search.n_playout
    );

    let gateway = Arc::new(Gateway::new(options, ModelFactory::new(), MctsSearch::new()));
    let app = router(gateway);

    let listener = tokio::net::TcpListener::bind(&addrs[..])
        .await
        .with_context(|| format!("Failed to bind {:?}", addrs))?;

    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
