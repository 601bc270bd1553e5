use crate::error::ConfigError;
use crate::extract::RuleSet;
use crate::filter::{FilterChain, PatternSyntax};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

/// Site profiles compiled into the binary, as (name, JSON) pairs
const BUILTIN_SITES: &[(&str, &str)] = &[
    ("city-of-mobile", include_str!("../sites/city_of_mobile.json")),
    ("uss-alabama", include_str!("../sites/uss_alabama.json")),
];

/// Configuration for one crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Listing page the crawl starts from
    pub seed_url: String,

    /// Depth of the deepest pages; pages at this depth are extracted, not scanned
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// URL path patterns a discovered link must match (any of them)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Whether `include_patterns` are globs or regexes
    #[serde(default)]
    pub pattern_syntax: PatternSyntax,

    /// Whether to follow links to other hosts
    #[serde(default)]
    pub allow_external: bool,

    /// Maximum number of simultaneous renders
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

/// Settings for the WebDriver-backed renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// URL of the WebDriver server (chromedriver, geckodriver, selenium)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Upper bound for navigating to and reading back one page
    #[serde(default = "default_render_timeout_secs")]
    pub render_timeout_secs: u64,
}

/// Everything needed to harvest one site: where to crawl and how to extract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProfile {
    pub name: String,
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    pub rules: RuleSet,
}

fn default_max_depth() -> usize {
    1
}

fn default_max_concurrency() -> usize {
    3
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_render_timeout_secs() -> u64 {
    45
}

impl CrawlConfig {
    /// Create a new configuration with default values
    pub fn new(seed_url: &str) -> Self {
        Self {
            seed_url: seed_url.to_string(),
            max_depth: default_max_depth(),
            include_patterns: Vec::new(),
            pattern_syntax: PatternSyntax::default(),
            allow_external: false,
            max_concurrency: default_max_concurrency(),
        }
    }

    pub fn with_patterns(mut self, patterns: &[&str]) -> Self {
        self.include_patterns = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    /// The parsed seed URL; only absolute HTTP(S) URLs are valid seeds
    pub fn seed(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.seed_url)
            .map_err(|_| ConfigError::SeedUrl(self.seed_url.clone()))?;
        if !crate::utils::is_http(&url) {
            return Err(ConfigError::SeedUrl(self.seed_url.clone()));
        }
        Ok(url)
    }

    /// Builds the filter chain described by this configuration
    pub fn filter_chain(&self) -> Result<FilterChain, ConfigError> {
        FilterChain::from_patterns(
            &self.include_patterns,
            self.pattern_syntax,
            self.allow_external,
        )
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            render_timeout_secs: default_render_timeout_secs(),
        }
    }
}

impl SiteProfile {
    /// Look up one of the profiles shipped with the crate
    pub fn builtin(name: &str) -> Result<Self, ConfigError> {
        let (_, json) = BUILTIN_SITES
            .iter()
            .find(|(site, _)| *site == name)
            .ok_or_else(|| ConfigError::UnknownSite(name.to_string()))?;
        Self::from_json(json)
    }

    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_SITES.iter().map(|(name, _)| *name)
    }

    /// Load a profile from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// A built-in site name, or else a path to a profile file
    pub fn resolve(name_or_path: &str) -> Result<Self, ConfigError> {
        match Self::builtin(name_or_path) {
            Ok(profile) => Ok(profile),
            Err(ConfigError::UnknownSite(_)) if Path::new(name_or_path).is_file() => {
                Self::from_file(name_or_path)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Field;

    #[test]
    fn test_builtin_profiles_load() {
        for name in SiteProfile::builtin_names() {
            let profile = SiteProfile::builtin(name).unwrap();
            assert_eq!(profile.name, name);
            assert_eq!(profile.crawl.max_depth, 1);
            assert!(!profile.crawl.allow_external);
            assert!(profile.crawl.seed().is_ok());
            assert!(profile.crawl.filter_chain().is_ok());
        }
    }

    #[test]
    fn test_city_of_mobile_profile() {
        let profile = SiteProfile::builtin("city-of-mobile").unwrap();
        assert_eq!(profile.crawl.seed_url, "https://www.cityofmobile.org/events/");
        assert_eq!(profile.crawl.include_patterns, vec!["*/events/*".to_string()]);
        assert_eq!(profile.rules.source_name, "City of Mobile");
        assert!(profile.rules.fields.contains_key(&Field::VenueName));
    }

    #[test]
    fn test_unknown_site() {
        let err = SiteProfile::builtin("nowhere").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSite(_)));
        assert!(matches!(
            SiteProfile::resolve("nowhere"),
            Err(ConfigError::UnknownSite(_))
        ));
    }

    #[test]
    fn test_defaults_from_minimal_json() {
        let json = r#"{
            "name": "minimal",
            "crawl": { "seed_url": "https://example.com/events/" },
            "rules": { "source_name": "Example" }
        }"#;
        let profile = SiteProfile::from_json(json).unwrap();
        assert_eq!(profile.crawl.max_depth, 1);
        assert_eq!(profile.crawl.max_concurrency, 3);
        assert_eq!(profile.crawl.pattern_syntax, PatternSyntax::Glob);
        assert_eq!(profile.renderer.webdriver_url, "http://localhost:4444");
        assert!(profile.renderer.headless);
        assert!(profile.rules.fields.is_empty());
    }

    #[test]
    fn test_profile_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        fs::write(
            &path,
            r#"{ "name": "file-site", "crawl": { "seed_url": "https://example.com/" },
                 "rules": { "source_name": "File" } }"#,
        )
        .unwrap();

        let profile = SiteProfile::resolve(path.to_str().unwrap()).unwrap();
        assert_eq!(profile.name, "file-site");
    }

    #[test]
    fn test_bad_seed() {
        assert!(matches!(
            CrawlConfig::new("not a url").seed(),
            Err(ConfigError::SeedUrl(_))
        ));
        assert!(matches!(
            CrawlConfig::new("file:///tmp/events.html").seed(),
            Err(ConfigError::SeedUrl(_))
        ));
    }
}
