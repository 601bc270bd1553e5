use crate::error::ConfigError;
use crate::utils::is_http;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// How the strings of a [`PatternRule`] are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSyntax {
    /// `*` matches any run of characters, `?` matches one, anchored to the whole path
    #[default]
    Glob,
    /// Unanchored regular expression
    Regex,
}

/// Accepts a URL when its path matches at least one of the configured patterns
#[derive(Debug, Clone)]
pub struct PatternRule {
    patterns: Vec<String>,
    regexes: Vec<Regex>,
}

impl PatternRule {
    /// Compile a set of patterns in the given syntax
    pub fn new(patterns: &[String], syntax: PatternSyntax) -> Result<Self, ConfigError> {
        let mut regexes = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let source = match syntax {
                PatternSyntax::Glob => glob_to_regex(pattern),
                PatternSyntax::Regex => pattern.clone(),
            };
            let regex = Regex::new(&source).map_err(|e| ConfigError::Pattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            regexes.push(regex);
        }

        Ok(Self {
            patterns: patterns.to_vec(),
            regexes,
        })
    }

    /// Convenience constructor for glob patterns
    pub fn glob(patterns: &[&str]) -> Result<Self, ConfigError> {
        let owned: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        Self::new(&owned, PatternSyntax::Glob)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    fn accepts(&self, candidate: &Url) -> bool {
        let path = candidate.path();
        self.regexes.iter().any(|regex| regex.is_match(path))
    }
}

/// Keeps the crawl on the origin's host unless external hosts are allowed
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeRule {
    pub allow_external: bool,
}

impl ScopeRule {
    fn accepts(&self, candidate: &Url, origin: &Url) -> bool {
        if self.allow_external {
            return true;
        }
        match (candidate.host_str(), origin.host_str()) {
            (Some(candidate_host), Some(origin_host)) => {
                candidate_host.eq_ignore_ascii_case(origin_host)
            }
            _ => false,
        }
    }
}

/// A single predicate over a candidate URL
#[derive(Debug, Clone)]
pub enum FilterRule {
    Pattern(PatternRule),
    Scope(ScopeRule),
}

impl FilterRule {
    fn accepts(&self, candidate: &Url, origin: &Url) -> bool {
        match self {
            FilterRule::Pattern(rule) => rule.accepts(candidate),
            FilterRule::Scope(rule) => rule.accepts(candidate, origin),
        }
    }
}

/// Conjunction of filter rules: a URL is in scope only if every rule accepts it
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    rules: Vec<FilterRule>,
}

impl FilterChain {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    /// Builds the usual chain: scope first, then the path patterns (if any)
    pub fn from_patterns(
        patterns: &[String],
        syntax: PatternSyntax,
        allow_external: bool,
    ) -> Result<Self, ConfigError> {
        let mut rules = vec![FilterRule::Scope(ScopeRule { allow_external })];
        if !patterns.is_empty() {
            rules.push(FilterRule::Pattern(PatternRule::new(patterns, syntax)?));
        }
        Ok(Self::new(rules))
    }

    pub fn with_rule(mut self, rule: FilterRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Determine if a raw candidate URL is in scope relative to `origin`.
    ///
    /// Malformed candidates are rejected rather than reported.
    pub fn accepts(&self, candidate: &str, origin: &Url) -> bool {
        match Url::parse(candidate) {
            Ok(url) => self.accepts_url(&url, origin),
            Err(_) => {
                ::log::trace!("Rejecting malformed URL: {}", candidate);
                false
            }
        }
    }

    /// Same as [`FilterChain::accepts`] for an already parsed URL
    pub fn accepts_url(&self, candidate: &Url, origin: &Url) -> bool {
        if !is_http(candidate) {
            return false;
        }
        self.rules.iter().all(|rule| rule.accepts(candidate, origin))
    }
}

/// Translate a glob into an anchored regex source string
fn glob_to_regex(glob: &str) -> String {
    let mut source = String::with_capacity(glob.len() * 2 + 2);
    source.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    source.push('$');
    source
}
