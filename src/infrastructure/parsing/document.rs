//! HTML document queries
//!
//! Extractors only see [`DocumentQuery`]; [`HtmlDocument`] is the `scraper`
//! backed implementation. Text results are whitespace-collapsed and trimmed,
//! and empty matches are dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{ParsingError, ParsingResult};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern must compile"));

const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub trait DocumentQuery {
    /// Full source markup of the page.
    fn markup(&self) -> &str;

    /// Text content of every element matching `selector`, in document order.
    fn select_texts(&self, selector: &str) -> ParsingResult<Vec<String>>;

    /// Values of `attr` on every element matching `selector`.
    fn select_attrs(&self, selector: &str, attr: &str) -> ParsingResult<Vec<String>>;

    /// Inner markup of the deepest element reached by walking `path`.
    ///
    /// Each level is searched inside the previous one; a missing level stops
    /// the walk and the broader level is returned. `None` when the first
    /// level is absent.
    fn inner_html_along(&self, path: &[String]) -> ParsingResult<Option<String>>;

    /// Cell texts of each row of the first table matching `selector`.
    fn table_rows(&self, selector: &str) -> ParsingResult<Option<Vec<Vec<String>>>>;

    /// Texts of `selector` matches that have no ancestor matching `excluded_ancestor`.
    fn texts_outside(&self, selector: &str, excluded_ancestor: &str) -> ParsingResult<Vec<String>>;

    /// Visible text of the whole page with scripts and styles left out.
    fn page_text(&self) -> String;

    fn first_text(&self, selector: &str) -> ParsingResult<Option<String>> {
        Ok(self.select_texts(selector)?.into_iter().next())
    }
}

pub struct HtmlDocument {
    source: String,
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let html = Html::parse_document(&source);
        Self { source, html }
    }
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("bytes", &self.source.len())
            .finish()
    }
}

impl DocumentQuery for HtmlDocument {
    fn markup(&self) -> &str {
        &self.source
    }

    fn select_texts(&self, selector: &str) -> ParsingResult<Vec<String>> {
        let selector = compile_selector(selector)?;
        Ok(self
            .html
            .select(&selector)
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
            .collect())
    }

    fn select_attrs(&self, selector: &str, attr: &str) -> ParsingResult<Vec<String>> {
        let selector = compile_selector(selector)?;
        Ok(self
            .html
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn inner_html_along(&self, path: &[String]) -> ParsingResult<Option<String>> {
        let Some((first, rest)) = path.split_first() else {
            return Ok(None);
        };

        let selector = compile_selector(first)?;
        let Some(mut current) = self.html.select(&selector).next() else {
            return Ok(None);
        };

        for level in rest {
            let selector = compile_selector(level)?;
            match current.select(&selector).next() {
                Some(deeper) => current = deeper,
                None => break,
            }
        }

        let inner = current.inner_html();
        Ok((!inner.trim().is_empty()).then_some(inner))
    }

    fn table_rows(&self, selector: &str) -> ParsingResult<Option<Vec<Vec<String>>>> {
        let table_selector = compile_selector(selector)?;
        let row_selector = compile_selector("tr")?;
        let cell_selector = compile_selector("th, td")?;

        let Some(table) = self.html.select(&table_selector).next() else {
            return Ok(None);
        };

        let rows = table
            .select(&row_selector)
            .map(|row| row.select(&cell_selector).map(|cell| element_text(&cell)).collect())
            .collect();
        Ok(Some(rows))
    }

    fn texts_outside(&self, selector: &str, excluded_ancestor: &str) -> ParsingResult<Vec<String>> {
        let selector = compile_selector(selector)?;
        let excluded = compile_selector(excluded_ancestor)?;

        Ok(self
            .html
            .select(&selector)
            .filter(|el| {
                !el.ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|ancestor| excluded.matches(&ancestor))
            })
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
            .collect())
    }

    fn page_text(&self) -> String {
        let mut pieces: Vec<&str> = Vec::new();
        for node in self.html.root_element().descendants() {
            let Some(text) = node.value().as_text() else { continue };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| INVISIBLE_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                pieces.push(text);
            }
        }
        collapse_whitespace(&pieces.join(" "))
    }
}

pub fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, format!("{e:?}")))
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Plain text of an HTML fragment.
pub fn plain_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    element_text(&parsed.root_element())
}

/// Text of the first non-empty `<p>` in an HTML fragment.
pub fn first_paragraph(fragment: &str) -> Option<String> {
    let parsed = Html::parse_fragment(fragment);
    let paragraph = Selector::parse("p").ok()?;
    parsed
        .select(&paragraph)
        .map(|p| element_text(&p))
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><title>Acme X100 | Shop</title>
        <style>.x { color: red }</style>
        <script>var hidden = "Wireless";</script></head>
        <body>
          <h1 class="page-title"><span>Acme   X100</span></h1>
          <div class="product attribute description">
            <div class="value"><p>First <b>para</b></p><ul><li>inside description list</li></ul></div>
          </div>
          <ul class="perks"><li>outside description list</li></ul>
          <table id="specs"><tr><th>Print Speed</th><td>200 cph</td></tr></table>
          <img class="gallery" src="https://cdn.example/a.jpg"><img class="gallery">
        </body></html>"#;

    fn path(levels: &[&str]) -> Vec<String> {
        levels.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_texts_are_collapsed() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(doc.first_text("h1").unwrap(), Some("Acme X100".to_string()));
        assert_eq!(doc.first_text("h2").unwrap(), None);
    }

    #[test]
    fn test_attrs_skip_missing() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(
            doc.select_attrs("img.gallery", "src").unwrap(),
            vec!["https://cdn.example/a.jpg".to_string()]
        );
    }

    #[test]
    fn test_inner_html_falls_back_to_broader_level() {
        let doc = HtmlDocument::parse(PAGE);
        let deepest = doc
            .inner_html_along(&path(&[".product.attribute.description", ".value", "[data-content-type=html]"]))
            .unwrap()
            .unwrap();
        assert!(deepest.starts_with("<p>First"));
        assert!(doc.inner_html_along(&path(&["#missing", ".value"])).unwrap().is_none());
    }

    #[test]
    fn test_table_rows() {
        let doc = HtmlDocument::parse(PAGE);
        let rows = doc.table_rows("table#specs").unwrap().unwrap();
        assert_eq!(rows, vec![vec!["Print Speed".to_string(), "200 cph".to_string()]]);
        assert!(doc.table_rows("table.none").unwrap().is_none());
    }

    #[test]
    fn test_texts_outside_container() {
        let doc = HtmlDocument::parse(PAGE);
        let items = doc.texts_outside("ul li", ".product.attribute.description").unwrap();
        assert_eq!(items, vec!["outside description list".to_string()]);
    }

    #[test]
    fn test_page_text_excludes_scripts_and_styles() {
        let text = HtmlDocument::parse(PAGE).page_text();
        assert!(text.contains("Acme X100"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let doc = HtmlDocument::parse(PAGE);
        assert!(matches!(
            doc.select_texts("div[").unwrap_err(),
            ParsingError::InvalidSelector { .. }
        ));
    }

    #[test]
    fn test_fragment_helpers() {
        assert_eq!(plain_text("<p>Fast <b>duplex</b></p>"), "Fast duplex");
        assert_eq!(first_paragraph("<div></div><p> </p><p>Second</p>"), Some("Second".to_string()));
        assert_eq!(first_paragraph("<div>none</div>"), None);
    }
}
