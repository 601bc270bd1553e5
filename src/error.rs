use thiserror::Error;

/// Problems with a site profile or crawl configuration. Always fatal to a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("invalid CSS selector {selector:?} for field {field}: {reason}")]
    Selector {
        field: String,
        selector: String,
        reason: String,
    },

    #[error("invalid regex {pattern:?} for field {field}: {reason}")]
    Regex {
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("field {field} cannot use strategy {strategy}")]
    StrategyShape { field: String, strategy: String },

    #[error("invalid seed URL {0:?}")]
    SeedUrl(String),

    #[error("unknown site {0:?}")]
    UnknownSite(String),

    #[error("failed to read site profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse site profile: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort a crawl run. Per-page failures never surface here.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not start a WebDriver session: {0}")]
    RendererInit(String),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to serialize events: {0}")]
    Json(#[from] serde_json::Error),
}
