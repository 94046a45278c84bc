/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the request
/// pipeline can decide what the user sees. Only `Config` is fatal, and only at
/// startup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),

    #[error("user is not authorized")]
    Unauthorized,

    #[error("attachment has no file name")]
    MissingFilename,

    #[error("cleaned file name is empty: {original}")]
    EmptyFilename { original: String },

    #[error("file too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("template already exists: {0}")]
    DuplicateTemplate(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
