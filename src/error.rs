use thiserror::Error;

/// Everything that can go wrong outside the pure evaluators.
///
/// The availability evaluator and the other record rules never produce one of
/// these; bad data there degrades to "closed" or gets dropped instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not load config: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not (de)serialize: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Could not get connection: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown timezone '{0}'")]
    Timezone(String),

    #[error("Datastore answered {status} for '{table}': {body}")]
    Remote {
        table: String,
        status: u16,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
