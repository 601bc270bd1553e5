use crate::config::RendererConfig;
use crate::crawlers::renderer::{CacheMode, PageResult, RenderOptions, Renderer};
use crate::error::CrawlError;
use async_trait::async_trait;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use url::Url;

/// Local driver endpoints tried when the configured one does not answer
const FALLBACK_WEBDRIVER_URLS: &[&str] = &[
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // geckodriver / Selenium default
    "http://127.0.0.1:4444",
];

/// Renders pages in a real browser driven over the WebDriver protocol.
///
/// Sessions are pooled per [`RenderOptions`] because script and cache
/// settings are fixed when a session is created. A session goes back to the
/// pool after a successful render and is closed after a failed one, since a
/// failed navigation often leaves it unusable.
pub struct WebDriverRenderer {
    webdriver_url: String,
    headless: bool,
    render_timeout: Duration,
    idle: Mutex<HashMap<RenderOptions, Vec<Client>>>,
}

impl WebDriverRenderer {
    /// Connects to a WebDriver server, keeping the probe session for reuse.
    ///
    /// Failing to reach any server is fatal for the run.
    pub async fn connect(config: &RendererConfig) -> Result<Self, CrawlError> {
        let options = RenderOptions::fresh();
        let caps = capabilities(&options, config.headless);

        let (webdriver_url, client) = connect_to_webdriver(&config.webdriver_url, caps)
            .await
            .ok_or_else(|| {
                CrawlError::RendererInit(format!(
                    "no WebDriver server answered at {} or the usual local ports",
                    config.webdriver_url
                ))
            })?;

        let mut idle = HashMap::new();
        idle.insert(options, vec![client]);

        Ok(Self {
            webdriver_url,
            headless: config.headless,
            render_timeout: Duration::from_secs(config.render_timeout_secs),
            idle: Mutex::new(idle),
        })
    }

    /// Takes an idle session for these options or opens a new one
    async fn checkout(&self, options: &RenderOptions) -> Result<Client, String> {
        let pooled = {
            let mut idle = self.idle.lock().await;
            idle.get_mut(options).and_then(Vec::pop)
        };
        if let Some(client) = pooled {
            return Ok(client);
        }

        ::log::debug!("Opening new WebDriver session at {}", self.webdriver_url);
        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities(options, self.headless));
        builder
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| e.to_string())
    }

    async fn checkin(&self, options: &RenderOptions, client: Client) {
        let mut idle = self.idle.lock().await;
        idle.entry(*options).or_default().push(client);
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    async fn render(&self, url: &Url, options: &RenderOptions) -> PageResult {
        let client = match self.checkout(options).await {
            Ok(client) => client,
            Err(e) => {
                ::log::error!("No WebDriver session available for {}: {}", url, e);
                return PageResult::failure(url.clone(), format!("no WebDriver session: {}", e));
            }
        };

        let started = std::time::Instant::now();
        match timeout(self.render_timeout, navigate(&client, url)).await {
            Ok(Ok((final_url, html))) => {
                ::log::debug!(
                    "Rendered {} in {:.2} seconds",
                    url,
                    started.elapsed().as_secs_f64()
                );
                self.checkin(options, client).await;
                PageResult::success(final_url, html)
            }
            Ok(Err(e)) => {
                discard(client).await;
                PageResult::failure(url.clone(), e.to_string())
            }
            Err(_) => {
                discard(client).await;
                PageResult::failure(
                    url.clone(),
                    format!("timed out after {} seconds", self.render_timeout.as_secs()),
                )
            }
        }
    }

    async fn shutdown(&self) {
        let mut idle = self.idle.lock().await;
        for (_, clients) in idle.drain() {
            for client in clients {
                if let Err(e) = client.close().await {
                    ::log::warn!("Failed to close WebDriver session: {}", e);
                }
            }
        }
    }
}

/// Navigates and reads back the final URL and rendered source
async fn navigate(client: &Client, url: &Url) -> Result<(Url, String), fantoccini::error::CmdError> {
    client.goto(url.as_str()).await?;
    let final_url = client.current_url().await?;
    let html = client.source().await?;
    Ok((final_url, html))
}

async fn discard(client: Client) {
    if let Err(e) = client.close().await {
        ::log::debug!("Failed to close broken WebDriver session: {}", e);
    }
}

/// Tries the configured WebDriver URL, then the well-known local ones
async fn connect_to_webdriver(webdriver_url: &str, caps: Capabilities) -> Option<(String, Client)> {
    let mut candidates = vec![webdriver_url.to_string()];
    for fallback in FALLBACK_WEBDRIVER_URLS {
        if *fallback != webdriver_url {
            candidates.push(fallback.to_string());
        }
    }

    for (attempt, url) in candidates.into_iter().enumerate() {
        if attempt > 0 {
            ::log::info!("Trying fallback WebDriver URL: {}", url);
        }

        let mut builder = ClientBuilder::native();
        builder.capabilities(caps.clone());
        match builder.connect(&url).await {
            Ok(client) => {
                ::log::info!("Connected to WebDriver at {}", url);
                return Some((url, client));
            }
            Err(e) if attempt == 0 => {
                ::log::error!("Failed to connect to WebDriver at {}: {}", url, e);
            }
            Err(_) => {}
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    None
}

/// Session capabilities for Chrome and Firefox; each driver ignores the other's block
fn capabilities(options: &RenderOptions, headless: bool) -> Capabilities {
    let mut chrome_args: Vec<&str> = Vec::new();
    let mut chrome_prefs = Map::new();
    let mut firefox_args: Vec<&str> = Vec::new();
    let mut firefox_prefs = Map::new();

    if headless {
        chrome_args.push("--headless=new");
        firefox_args.push("-headless");
    }

    if !options.javascript_enabled {
        chrome_prefs.insert(
            "profile.managed_default_content_settings.javascript".to_string(),
            json!(2),
        );
        firefox_prefs.insert("javascript.enabled".to_string(), Value::Bool(false));
    }

    if options.cache_mode == CacheMode::Bypass {
        chrome_args.push("--disk-cache-size=1");
        chrome_args.push("--media-cache-size=1");
        firefox_prefs.insert("browser.cache.disk.enable".to_string(), Value::Bool(false));
        firefox_prefs.insert("browser.cache.memory.enable".to_string(), Value::Bool(false));
    }

    let mut caps = Capabilities::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({ "args": chrome_args, "prefs": chrome_prefs }),
    );
    caps.insert(
        "moz:firefoxOptions".to_string(),
        json!({ "args": firefox_args, "prefs": firefox_prefs }),
    );
    caps
}
