//! Rule-driven extraction of [`EventRecord`]s from rendered HTML.
//!
//! A [`RuleSet`] is plain data. [`Extractor::new`] compiles its selectors and
//! regexes once, so a bad rule is reported as a configuration error before the
//! crawl starts and extraction itself can never fail: a field whose strategies
//! all come up empty is simply absent from the record.

pub mod rules;

#[cfg(test)]
mod tests;

pub use rules::{ExtractionRule, Field, PostProcess, RuleSet, Strategy};

use crate::error::ConfigError;
use crate::parsers::{TextJoin, join_text_nodes, non_empty, page_text};
use crate::results::EventRecord;
use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};
use url::Url;

#[derive(Debug)]
enum CompiledStrategy {
    Text {
        selector: Selector,
        join: TextJoin,
    },
    Attr {
        selector: Selector,
        attr: String,
    },
    AllText {
        selector: Selector,
    },
    TextMatching {
        selector: Selector,
        pattern: Regex,
        join: TextJoin,
    },
    PageRegex {
        pattern: Regex,
    },
}

#[derive(Debug)]
struct CompiledRule {
    field: Field,
    strategies: Vec<CompiledStrategy>,
    post: Option<PostProcess>,
}

#[derive(Debug)]
enum FieldValue {
    Text(String),
    List(Vec<String>),
}

/// Per-page state shared by every strategy while one page is extracted
struct PageContext<'a> {
    doc: &'a Html,
    page_url: &'a Url,
    text: Option<String>,
}

impl PageContext<'_> {
    fn text(&mut self) -> &str {
        let doc = self.doc;
        self.text.get_or_insert_with(|| page_text(doc))
    }
}

/// Turns rendered HTML into an [`EventRecord`] using a compiled [`RuleSet`]
#[derive(Debug)]
pub struct Extractor {
    source_name: String,
    rules: Vec<CompiledRule>,
}

impl Extractor {
    pub fn new(rule_set: RuleSet) -> Result<Self, ConfigError> {
        let mut rules = Vec::with_capacity(rule_set.fields.len());
        for (field, rule) in rule_set.fields {
            let mut strategies = Vec::with_capacity(rule.strategies.len());
            for strategy in &rule.strategies {
                strategies.push(compile_strategy(field, strategy)?);
            }
            rules.push(CompiledRule {
                field,
                strategies,
                post: rule.post,
            });
        }

        Ok(Self {
            source_name: rule_set.source_name,
            rules,
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Extract one record from a rendered page. `page_url` is the final URL.
    pub fn extract(&self, html: &str, page_url: &Url) -> EventRecord {
        let doc = Html::parse_document(html);
        let mut ctx = PageContext {
            doc: &doc,
            page_url,
            text: None,
        };
        let mut record = EventRecord::new(page_url.to_string(), self.source_name.clone());

        for rule in &self.rules {
            match evaluate_rule(rule, &mut ctx) {
                Some(value) => {
                    ::log::trace!("{}: matched {} on {}", self.source_name, rule.field, page_url);
                    assign(&mut record, rule.field, value);
                }
                None => {
                    ::log::trace!("{}: no value for {} on {}", self.source_name, rule.field, page_url);
                }
            }
        }

        record
    }
}

fn compile_strategy(field: Field, strategy: &Strategy) -> Result<CompiledStrategy, ConfigError> {
    let list_strategy = matches!(strategy, Strategy::AllText { .. });
    if list_strategy != field.is_list() {
        return Err(ConfigError::StrategyShape {
            field: field.to_string(),
            strategy: strategy.kind().to_string(),
        });
    }

    let compiled = match strategy {
        Strategy::Text { selector, join } => CompiledStrategy::Text {
            selector: compile_selector(field, selector)?,
            join: *join,
        },
        Strategy::Attr { selector, attr } => CompiledStrategy::Attr {
            selector: compile_selector(field, selector)?,
            attr: attr.clone(),
        },
        Strategy::AllText { selector } => CompiledStrategy::AllText {
            selector: compile_selector(field, selector)?,
        },
        Strategy::TextMatching {
            selector,
            pattern,
            join,
        } => CompiledStrategy::TextMatching {
            selector: compile_selector(field, selector)?,
            pattern: compile_regex(field, pattern, true)?,
            join: *join,
        },
        Strategy::PageRegex { pattern } => CompiledStrategy::PageRegex {
            pattern: compile_regex(field, pattern, false)?,
        },
    };
    Ok(compiled)
}

fn compile_selector(field: Field, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::Selector {
        field: field.to_string(),
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn compile_regex(field: Field, pattern: &str, case_insensitive: bool) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| ConfigError::Regex {
            field: field.to_string(),
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// First strategy that produces a non-empty, post-processed value wins
fn evaluate_rule(rule: &CompiledRule, ctx: &mut PageContext<'_>) -> Option<FieldValue> {
    rule.strategies.iter().find_map(|strategy| {
        let raw = evaluate_strategy(strategy, ctx)?;
        match &rule.post {
            Some(post) => post_process(raw, post, ctx.page_url),
            None => Some(raw),
        }
    })
}

fn evaluate_strategy(strategy: &CompiledStrategy, ctx: &mut PageContext<'_>) -> Option<FieldValue> {
    match strategy {
        CompiledStrategy::Text { selector, join } => {
            let element = ctx.doc.select(selector).next()?;
            element_text(element, *join).map(FieldValue::Text)
        }
        CompiledStrategy::Attr { selector, attr } => {
            let element = ctx.doc.select(selector).next()?;
            element.value().attr(attr).and_then(non_empty).map(FieldValue::Text)
        }
        CompiledStrategy::AllText { selector } => {
            let items: Vec<String> = ctx
                .doc
                .select(selector)
                .filter_map(|element| element_text(element, TextJoin::Space))
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(FieldValue::List(items))
            }
        }
        CompiledStrategy::TextMatching {
            selector,
            pattern,
            join,
        } => ctx
            .doc
            .select(selector)
            .find(|element| pattern.is_match(&element.text().collect::<String>()))
            .and_then(|element| element_text(element, *join))
            .map(FieldValue::Text),
        CompiledStrategy::PageRegex { pattern } => pattern
            .find(ctx.text())
            .and_then(|m| non_empty(m.as_str()))
            .map(FieldValue::Text),
    }
}

fn element_text(element: ElementRef<'_>, join: TextJoin) -> Option<String> {
    join_text_nodes(element.text(), join)
}

fn post_process(value: FieldValue, post: &PostProcess, page_url: &Url) -> Option<FieldValue> {
    match value {
        FieldValue::Text(text) => post_process_text(&text, post, page_url).map(FieldValue::Text),
        FieldValue::List(items) => {
            let items: Vec<String> = items
                .iter()
                .filter_map(|item| post_process_text(item, post, page_url))
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(FieldValue::List(items))
            }
        }
    }
}

fn post_process_text(text: &str, post: &PostProcess, page_url: &Url) -> Option<String> {
    match post {
        PostProcess::Segment { delimiter, index } => {
            if delimiter.is_empty() {
                return None;
            }
            text.split(delimiter.as_str()).nth(*index).and_then(non_empty)
        }
        PostProcess::AbsoluteUrl => page_url.join(text).ok().map(|url| url.to_string()),
    }
}

fn assign(record: &mut EventRecord, field: Field, value: FieldValue) {
    let text = match value {
        FieldValue::List(items) => {
            if field == Field::Categories {
                record.categories = Some(items);
            }
            return;
        }
        FieldValue::Text(text) => text,
    };

    let slot = match field {
        Field::Title => &mut record.title,
        Field::DateTime => &mut record.date_time,
        Field::Date => &mut record.date,
        Field::Time => &mut record.time,
        Field::Location => &mut record.location,
        Field::VenueName => &mut record.venue_name,
        Field::Description => &mut record.description,
        Field::Organiser => &mut record.organiser,
        Field::Phone => &mut record.phone,
        Field::Email => &mut record.email,
        Field::TicketsUrl => &mut record.tickets_url,
        Field::ImageUrl => &mut record.image_url,
        Field::Categories => return,
    };
    *slot = Some(text);
}
