pub mod collector;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod extract;
pub mod filter;
pub mod output;
pub mod parsers;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::SiteProfile;
pub use crawlers::CrawlSummary;
pub use error::{ConfigError, CrawlError};
pub use results::EventRecord;

use crawlers::{Frontier, Renderer, WebDriverRenderer};
use extract::Extractor;
use std::path::Path;
use std::sync::Arc;

/// Builder for one harvest run: a site profile plus run-time overrides
pub struct Harvest {
    profile: SiteProfile,
    renderer: Option<Arc<dyn Renderer>>,
}

impl Harvest {
    /// Create a new Harvest for the given site profile
    pub fn new(profile: SiteProfile) -> Self {
        Self {
            profile,
            renderer: None,
        }
    }

    /// Start from one of the built-in site profiles
    pub fn for_site(name: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(SiteProfile::builtin(name)?))
    }

    /// Load the site profile from a JSON file
    pub fn with_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::new(SiteProfile::from_file(path)?))
    }

    /// Set the maximum number of simultaneous renders
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.profile.crawl.max_concurrency = max_concurrency;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.profile.crawl.max_depth = max_depth;
        self
    }

    pub fn with_allow_external(mut self, allow_external: bool) -> Self {
        self.profile.crawl.allow_external = allow_external;
        self
    }

    /// Override the WebDriver server used when no renderer is supplied
    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.profile.renderer.webdriver_url = webdriver_url.to_string();
        self
    }

    /// Use a custom renderer instead of connecting to a WebDriver server
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Crawl the site and return the extracted events.
    ///
    /// The profile is validated before any browser session is opened. A
    /// WebDriver renderer created here is shut down when the crawl ends.
    pub async fn run(self) -> Result<CrawlSummary, CrawlError> {
        let crawl = &self.profile.crawl;
        crawl.seed()?;
        crawl.filter_chain()?;
        let extractor = Arc::new(Extractor::new(self.profile.rules.clone())?);

        let (renderer, owned) = match self.renderer {
            Some(renderer) => (renderer, false),
            None => {
                let renderer: Arc<dyn Renderer> =
                    Arc::new(WebDriverRenderer::connect(&self.profile.renderer).await?);
                (renderer, true)
            }
        };

        ::log::info!("Harvesting {} from {}", self.profile.name, crawl.seed_url);
        let frontier = Frontier::new(crawl, Arc::clone(&renderer), extractor)?;
        let summary = frontier.run().await;

        if owned {
            renderer.shutdown().await;
        }
        summary
    }
}
