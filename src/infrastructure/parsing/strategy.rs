//! Locators and fallback chains
//!
//! A [`Locator`] is one way of pulling candidate values out of a page. Field
//! extractors hold an ordered `Vec<Locator>` and evaluate it through a
//! [`FallbackChain`], which decides how candidates from successive locators
//! are combined.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::document::{DocumentQuery, compile_selector};
use super::{ParsingError, ParsingResult};

/// What a [`Locator::Pattern`] is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSource {
    /// Visible page text
    #[default]
    Text,
    /// Raw page markup, including scripts
    Markup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    /// Text content of matching elements
    Text { selector: String },
    /// Attribute value of matching elements
    Attr { selector: String, attr: String },
    /// Inner markup along a nested selector path
    InnerHtml { path: Vec<String> },
    /// Regex over the page; capture group 1 when present, else the whole match
    Pattern {
        regex: String,
        #[serde(default)]
        source: PatternSource,
    },
}

impl Locator {
    pub fn text(selector: &str) -> Self {
        Self::Text {
            selector: selector.to_string(),
        }
    }

    pub fn attr(selector: &str, attr: &str) -> Self {
        Self::Attr {
            selector: selector.to_string(),
            attr: attr.to_string(),
        }
    }

    pub fn inner_html(path: &[&str]) -> Self {
        Self::InnerHtml {
            path: path.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    pub fn pattern(regex: &str) -> Self {
        Self::Pattern {
            regex: regex.to_string(),
            source: PatternSource::Text,
        }
    }

    pub fn markup_pattern(regex: &str) -> Self {
        Self::Pattern {
            regex: regex.to_string(),
            source: PatternSource::Markup,
        }
    }

    /// All candidates this locator yields, in document order.
    pub fn evaluate(&self, doc: &dyn DocumentQuery) -> ParsingResult<Vec<String>> {
        match self {
            Self::Text { selector } => doc.select_texts(selector),
            Self::Attr { selector, attr } => doc.select_attrs(selector, attr),
            Self::InnerHtml { path } => Ok(doc.inner_html_along(path)?.into_iter().collect()),
            Self::Pattern { regex, source } => {
                let pattern = compile_pattern(regex)?;
                let haystack = match source {
                    PatternSource::Text => doc.page_text(),
                    PatternSource::Markup => doc.markup().to_string(),
                };
                Ok(pattern
                    .captures_iter(&haystack)
                    .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|value| !value.is_empty())
                    .collect())
            }
        }
    }

    /// Check that every selector and regex in this locator compiles.
    pub fn validate(&self) -> ParsingResult<()> {
        match self {
            Self::Text { selector } | Self::Attr { selector, .. } => compile_selector(selector).map(|_| ()),
            Self::InnerHtml { path } => {
                if path.is_empty() {
                    return Err(ParsingError::invalid_selector("", "empty inner-html path"));
                }
                path.iter().try_for_each(|level| compile_selector(level).map(|_| ()))
            }
            Self::Pattern { regex, .. } => compile_pattern(regex).map(|_| ()),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text { selector } => write!(f, "text({selector})"),
            Self::Attr { selector, attr } => write!(f, "attr({selector} @{attr})"),
            Self::InnerHtml { path } => write!(f, "inner_html({})", path.join(" > ")),
            Self::Pattern { regex, source } => write!(f, "pattern({regex} on {source:?})"),
        }
    }
}

pub fn compile_pattern(pattern: &str) -> ParsingResult<Regex> {
    Regex::new(pattern).map_err(|e| ParsingError::invalid_pattern(pattern, e))
}

/// Ordered locators for one field.
pub struct FallbackChain<'a> {
    field: &'a str,
    locators: &'a [Locator],
}

impl<'a> FallbackChain<'a> {
    pub fn new(field: &'a str, locators: &'a [Locator]) -> Self {
        Self { field, locators }
    }

    fn candidates(&self, doc: &dyn DocumentQuery, locator: &Locator) -> Vec<String> {
        match locator.evaluate(doc) {
            Ok(values) => values,
            Err(e) => {
                warn!("Skipping locator {} for {}: {}", locator, self.field, e);
                Vec::new()
            }
        }
    }

    /// First candidate of the first locator that yields anything.
    pub fn first(&self, doc: &dyn DocumentQuery) -> Option<String> {
        self.first_valid(doc, |value| Some(value.to_string()))
    }

    /// First candidate, across locators in order, that `accept` turns into a value.
    pub fn first_valid<T>(&self, doc: &dyn DocumentQuery, accept: impl Fn(&str) -> Option<T>) -> Option<T> {
        for locator in self.locators {
            for candidate in self.candidates(doc, locator) {
                if let Some(value) = accept(&candidate) {
                    debug!("Extracted {} using locator {}: {}", self.field, locator, candidate);
                    return Some(value);
                }
            }
        }
        debug!("No locator matched for {}", self.field);
        None
    }

    /// Candidate list of the first locator whose list, after `keep`, is non-empty.
    pub fn first_list(&self, doc: &dyn DocumentQuery, keep: impl Fn(&str) -> Option<String>) -> Vec<String> {
        for locator in self.locators {
            let values: Vec<String> = self
                .candidates(doc, locator)
                .iter()
                .filter_map(|candidate| keep(candidate))
                .collect();
            if !values.is_empty() {
                debug!("Extracted {} {} item(s) using locator {}", values.len(), self.field, locator);
                return values;
            }
        }
        Vec::new()
    }

    /// Candidates of every locator, filtered and mapped by `keep`, unique in first-seen order.
    pub fn accumulate_unique(
        &self,
        doc: &dyn DocumentQuery,
        keep: impl Fn(&str) -> Option<String>,
    ) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut collected = Vec::new();
        for locator in self.locators {
            for candidate in self.candidates(doc, locator) {
                if let Some(value) = keep(&candidate) {
                    if seen.insert(value.clone()) {
                        collected.push(value);
                    }
                }
            }
        }
        debug!("Accumulated {} unique {} value(s)", collected.len(), self.field);
        collected
    }
}
