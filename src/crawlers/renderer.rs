use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

/// Whether the renderer may serve a page from its cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Always fetch fresh content
    #[default]
    Bypass,
    Use,
}

/// Per-request rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderOptions {
    pub javascript_enabled: bool,
    pub cache_mode: CacheMode,
}

impl RenderOptions {
    /// What the crawler always asks for: scripts on, no cache
    pub fn fresh() -> Self {
        Self {
            javascript_enabled: true,
            cache_mode: CacheMode::Bypass,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Outcome of rendering one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// Final URL after redirects; the requested URL when rendering failed
    pub url: Url,
    pub html: String,
    pub success: bool,
    pub error: Option<String>,
}

impl PageResult {
    pub fn success(url: Url, html: String) -> Self {
        Self {
            url,
            html,
            success: true,
            error: None,
        }
    }

    pub fn failure(url: Url, error: impl Into<String>) -> Self {
        Self {
            url,
            html: String::new(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Turns a URL into rendered HTML.
///
/// Implementations report per-page problems through [`PageResult::failure`]
/// rather than an error, so one bad page never stops a crawl.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, url: &Url, options: &RenderOptions) -> PageResult;

    /// Release any resources (browser sessions) held by the renderer
    async fn shutdown(&self) {}
}
