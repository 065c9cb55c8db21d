use std::sync::Arc;

use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use kotekli_backend::{
    catalog::Venue,
    config::Config,
    database::{sqlite::SqliteDatabase, Record},
    server::Server,
    sync::Syncer,
};
use r2d2_sqlite::SqliteConnectionManager;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> kotekli_backend::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("KOTEKLI_CONFIG").ok())
        .unwrap_or_else(|| "config.json".to_string());
    let config = Config::load(&config_path)?;
    let timezone = config.timezone()?;
    let address = config.bind_address()?;
    info!(
        "Starting with database {}, timezone {}, locale {:?}",
        config.database_path, timezone, config.locale
    );

    let manager = SqliteConnectionManager::file(&config.database_path);
    let pool = Arc::new(r2d2::Pool::builder().build(manager)?);
    {
        let connection = pool.get()?;
        SqliteDatabase::create_tables(&connection)?;
        match SqliteDatabase::last_synced(&connection, Venue::TABLE)? {
            Some(synced_at) => info!("Mirror last synced at {}", synced_at),
            None => info!("Mirror is empty"),
        }
    }

    match config.sync.clone() {
        Some(sync_config) => {
            let syncer = Syncer::setup(pool.clone(), sync_config, timezone)?;
            tokio::spawn(async move {
                syncer.run().await;
            });
        }
        None => warn!("No sync section in config, serving the mirror as it is"),
    }

    let server = Server::setup(pool.clone(), timezone, config.locale);
    let listener = TcpListener::bind(address).await?;
    info!("Listening on http://{}", address);

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(connection) => connection,
            Err(err) => {
                error!("Could not accept connection: {}", err);
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let server_clone = server.clone();
        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, server_clone)
                .await
            {
                error!("{}", err);
            }
        });
    }
}
