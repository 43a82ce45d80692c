//! Clean-up of extracted description markup
//!
//! Cutting a sub-tree out of a page builder layout leaves wrapper elements
//! behind and, once those openers are dropped, dangling closing tags. This
//! pass strips the wrappers, trims surplus closers from the tail and
//! collapses whitespace. It never fails.

use once_cell::sync::Lazy;
use regex::Regex;

/// Block elements whose opener/closer balance is enforced.
pub const BALANCED_TAGS: &[&str] = &["div", "section", "article"];

static WRAPPER_OPENERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<[a-z][a-z0-9-]*\b[^>]*?\s(?:data-content-type="html"|data-appearance="default"|data-element="main"|data-decoded="true"|class="value")[^>]*>"#,
    )
    .expect("wrapper pattern must compile")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern must compile"));

static OPENERS: Lazy<Vec<(&'static str, Regex, Regex)>> = Lazy::new(|| {
    BALANCED_TAGS
        .iter()
        .map(|tag| {
            let open = Regex::new(&format!(r"(?i)<{tag}\b[^>]*>")).expect("opener pattern must compile");
            let close = Regex::new(&format!(r"(?i)</{tag}\s*>")).expect("closer pattern must compile");
            (*tag, open, close)
        })
        .collect()
});

pub fn repair(fragment: &str) -> String {
    let mut html = WRAPPER_OPENERS.replace_all(fragment, "").into_owned();

    for (_, opener, closer) in OPENERS.iter() {
        let opened = opener.find_iter(&html).count();
        let closers: Vec<(usize, usize)> = closer.find_iter(&html).map(|m| (m.start(), m.end())).collect();
        let excess = closers.len().saturating_sub(opened);

        for &(start, end) in closers.iter().rev().take(excess) {
            html.replace_range(start..end, "");
        }
    }

    WHITESPACE.replace_all(&html, " ").trim().to_string()
}

/// Opener and closer counts for `tag`.
pub fn tag_balance(html: &str, tag: &str) -> (usize, usize) {
    OPENERS
        .iter()
        .find(|(name, _, _)| *name == tag)
        .map_or((0, 0), |(_, opener, closer)| {
            (opener.find_iter(html).count(), closer.find_iter(html).count())
        })
}
