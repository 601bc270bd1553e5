use crate::parsers::TextJoin;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Logical fields of an [`EventRecord`](crate::results::EventRecord) that rules can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    DateTime,
    Date,
    Time,
    Location,
    VenueName,
    Description,
    Categories,
    Organiser,
    Phone,
    Email,
    TicketsUrl,
    ImageUrl,
}

impl Field {
    /// Fields holding a sequence of values rather than a single string
    pub fn is_list(self) -> bool {
        matches!(self, Field::Categories)
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::DateTime => "date_time",
            Field::Date => "date",
            Field::Time => "time",
            Field::Location => "location",
            Field::VenueName => "venue_name",
            Field::Description => "description",
            Field::Categories => "categories",
            Field::Organiser => "organiser",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::TicketsUrl => "tickets_url",
            Field::ImageUrl => "image_url",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One way of locating a field's value in a rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Text of the first element matching `selector`
    Text {
        selector: String,
        #[serde(default)]
        join: TextJoin,
    },
    /// Attribute value of the first element matching `selector`
    Attr { selector: String, attr: String },
    /// Neat text of every element matching `selector` (list fields only)
    AllText { selector: String },
    /// Text of the first element matching `selector` whose text matches
    /// `pattern` (case-insensitive)
    TextMatching {
        selector: String,
        pattern: String,
        #[serde(default)]
        join: TextJoin,
    },
    /// First match of `pattern` anywhere in the page text
    PageRegex { pattern: String },
}

impl Strategy {
    pub fn text(selector: &str) -> Self {
        Strategy::Text {
            selector: selector.to_string(),
            join: TextJoin::Space,
        }
    }

    pub fn text_joined(selector: &str, join: TextJoin) -> Self {
        Strategy::Text {
            selector: selector.to_string(),
            join,
        }
    }

    pub fn attr(selector: &str, attr: &str) -> Self {
        Strategy::Attr {
            selector: selector.to_string(),
            attr: attr.to_string(),
        }
    }

    pub fn all_text(selector: &str) -> Self {
        Strategy::AllText {
            selector: selector.to_string(),
        }
    }

    pub fn page_regex(pattern: &str) -> Self {
        Strategy::PageRegex {
            pattern: pattern.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::Text { .. } => "text",
            Strategy::Attr { .. } => "attr",
            Strategy::AllText { .. } => "all_text",
            Strategy::TextMatching { .. } => "text_matching",
            Strategy::PageRegex { .. } => "page_regex",
        }
    }
}

/// Site-specific cleanup applied to a raw strategy result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostProcess {
    /// Split on `delimiter` and keep segment `index`; a missing segment makes
    /// the value absent. Used to pull an image URL out of a proxy parameter.
    Segment { delimiter: String, index: usize },
    /// Resolve the value against the page URL
    AbsoluteUrl,
}

/// Ordered strategies for one field; the first non-empty result wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRule {
    pub strategies: Vec<Strategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<PostProcess>,
}

impl ExtractionRule {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self {
            strategies,
            post: None,
        }
    }

    pub fn single(strategy: Strategy) -> Self {
        Self::new(vec![strategy])
    }

    pub fn with_post(mut self, post: PostProcess) -> Self {
        self.post = Some(post);
        self
    }
}

/// Declarative extraction recipe for one site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Value written to every record's `source_name`
    pub source_name: String,

    /// Fields without a rule are always absent
    #[serde(default)]
    pub fields: BTreeMap<Field, ExtractionRule>,
}

impl RuleSet {
    pub fn new(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: Field, rule: ExtractionRule) -> Self {
        self.fields.insert(field, rule);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_set_from_json() {
        let json = r#"{
            "source_name": "City of Mobile",
            "fields": {
                "title": { "strategies": [ { "kind": "text", "selector": "h1" } ] },
                "image_url": {
                    "strategies": [ { "kind": "attr", "selector": ".col-lg-9 img", "attr": "src" } ],
                    "post": { "kind": "segment", "delimiter": "file=", "index": 1 }
                },
                "date_time": {
                    "strategies": [ { "kind": "text", "selector": "[itemprop='startDate']", "join": "none" } ]
                }
            }
        }"#;
        let rules: RuleSet = serde_json::from_str(json).unwrap();
        assert_eq!(rules.source_name, "City of Mobile");
        assert_eq!(
            rules.fields[&Field::Title],
            ExtractionRule::single(Strategy::text("h1"))
        );
        assert_eq!(
            rules.fields[&Field::ImageUrl].post,
            Some(PostProcess::Segment {
                delimiter: "file=".to_string(),
                index: 1
            })
        );
        assert_eq!(
            rules.fields[&Field::DateTime].strategies[0],
            Strategy::text_joined("[itemprop='startDate']", TextJoin::None)
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{ "source_name": "x", "fields": { "headline": { "strategies": [] } } }"#;
        assert!(serde_json::from_str::<RuleSet>(json).is_err());
    }

    #[test]
    fn test_field_names_match_record_keys() {
        assert_eq!(Field::DateTime.to_string(), "date_time");
        assert_eq!(
            serde_json::to_value(Field::TicketsUrl).unwrap(),
            serde_json::json!("tickets_url")
        );
        assert!(Field::Categories.is_list());
        assert!(!Field::Title.is_list());
    }
}
