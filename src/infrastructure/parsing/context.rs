//! Per-page parsing context
//!
//! Carries the page URL so relative links and images can be resolved.

use url::Url;

#[derive(Debug, Clone)]
pub struct PageContext {
    url: String,
    base: Option<Url>,
}

impl PageContext {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let base = Url::parse(&url).ok();
        Self { url, base }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Absolute HTTP(S) form of `href`, without fragment.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let mut resolved = match &self.base {
            Some(base) => base.join(href).ok()?,
            None => Url::parse(href).ok()?,
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            return None;
        }
        resolved.set_fragment(None);
        Some(resolved.to_string())
    }

    /// Whether `other` addresses this page, ignoring fragment and trailing slash.
    pub fn is_same_page(&self, other: &str) -> bool {
        let normalize = |u: &str| u.split('#').next().unwrap_or_default().trim_end_matches('/').to_string();
        normalize(&self.url) == normalize(other)
    }

    /// Non-empty path segments of the page URL.
    pub fn path_segments(&self) -> Vec<String> {
        self.base
            .as_ref()
            .and_then(|url| url.path_segments())
            .map(|segments| segments.filter(|s| !s.is_empty()).map(str::to_string).collect())
            .unwrap_or_default()
    }
}
