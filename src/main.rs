use std::sync::Arc;

use tracing::info;

use parley::chat::Context;
use parley::server::session;
use parley::{ChatListener, Config, IpLookup, Registry};

#[tokio::main]
async fn main() -> parley::Result<()> {
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    if let Err(e) = parley::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        parley::logging::init_console_only(&config.logging.level);
    }

    info!("parley chat server starting");

    let ctx = Arc::new(Context {
        registry: Registry::new(),
        lookup: IpLookup::new(&config.lookup)?,
    });

    let listener = ChatListener::bind(&config.server).await?;
    info!("chat running on port: {}", config.server.port);

    listener
        .run(move |stream, addr| {
            let ctx = ctx.clone();
            async move { session::run(stream, addr, ctx).await }
        })
        .await
}
