//! Image reference resolution: banner fields, images embedded in page
//! content and the thumbnail service.

use engine_logging::{engine_debug, engine_warn};
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use url::Url;

const PREVIEW_SERVICE_MARKER: &str = "getpreview.ashx";
const PREVIEW_RESOLUTION: &str = "6";
const BANNER_KEYS: [&str; 4] = ["Url", "url", "src", "value"];
/// Number of JSON-in-a-string layers that will be unwrapped.
const MAX_JSON_UNWRAP: u8 = 1;

/// Base addresses against which relative references are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteBase {
    /// Absolute site URL without trailing slash.
    pub site_url: String,
    /// Path part of `site_url`, empty for a root site.
    pub server_relative_url: String,
}

impl SiteBase {
    pub fn new(site_url: &str) -> Self {
        let site_url = site_url.trim().trim_end_matches('/').to_string();
        let server_relative_url = Url::parse(&site_url)
            .map(|url| url.path().trim_end_matches('/').to_string())
            .unwrap_or_default();
        Self {
            site_url,
            server_relative_url,
        }
    }

    fn origin(&self) -> &str {
        self.site_url
            .strip_suffix(self.server_relative_url.as_str())
            .unwrap_or(&self.site_url)
    }

    /// Makes `reference` absolute. Values carrying a scheme are kept;
    /// root-relative and bare values are prefixed with the site URL.
    ///
    /// Exception: a root-relative path that already begins with the site's
    /// own path (`/sites/news/...` on `/sites/news`) is joined to the origin
    /// only. Prefixing the full site URL would repeat the site path and
    /// point at a file that does not exist.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return None;
        }
        if Url::parse(trimmed).is_ok() {
            return Some(trimmed.to_string());
        }
        if trimmed.starts_with('/') {
            let within_site = !self.server_relative_url.is_empty()
                && (trimmed == self.server_relative_url
                    || trimmed.starts_with(&format!("{}/", self.server_relative_url)));
            if within_site {
                return Some(format!("{}{trimmed}", self.origin()));
            }
            return Some(format!("{}{trimmed}", self.site_url));
        }
        Some(format!("{}/{trimmed}", self.site_url))
    }

    pub fn default_thumbnail_url(&self) -> String {
        format!("{}/_layouts/15/images/sitepagethumbnail.png", self.site_url)
    }

    /// Thumbnail-service URL rendering a preview of the page at
    /// `{server_relative_url}/{segment}/{file_name}`.
    pub fn page_preview_url(&self, segment: &str, file_name: &str) -> String {
        let path = format!("{}/{segment}/{file_name}", self.server_relative_url);
        format!(
            "{}/_layouts/15/{PREVIEW_SERVICE_MARKER}?path={}&resolution={PREVIEW_RESOLUTION}",
            self.site_url,
            urlencoding::encode(&path)
        )
    }
}

/// Detected shape of a banner field.
enum BannerShape<'a> {
    Absent,
    Text(&'a str),
    Structured(&'a Map<String, Value>),
}

impl<'a> BannerShape<'a> {
    fn detect(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::String(text)) => BannerShape::Text(text),
            Some(Value::Object(map)) => BannerShape::Structured(map),
            _ => BannerShape::Absent,
        }
    }
}

/// Resolves a banner field (absent, plain string, JSON-encoded string or
/// object) to an absolute image URL.
pub fn resolve_banner(value: Option<&Value>, base: &SiteBase) -> Option<String> {
    resolve_banner_shape(BannerShape::detect(value), base, 0)
}

fn resolve_banner_shape(shape: BannerShape<'_>, base: &SiteBase, depth: u8) -> Option<String> {
    match shape {
        BannerShape::Absent => None,
        BannerShape::Text(text) => resolve_banner_text(text, base, depth),
        BannerShape::Structured(map) => BANNER_KEYS
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|candidate| !candidate.trim().is_empty())
            .and_then(|candidate| resolve_banner_text(candidate, base, depth)),
    }
}

fn resolve_banner_text(text: &str, base: &SiteBase, depth: u8) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if depth >= MAX_JSON_UNWRAP {
            engine_debug!("Banner value nested too deeply, ignoring");
            return None;
        }
        return match serde_json::from_str::<Value>(trimmed) {
            Ok(parsed) => resolve_banner_shape(BannerShape::detect(Some(&parsed)), base, depth + 1),
            Err(err) => {
                engine_warn!("Unable to parse banner image JSON: {}", err);
                None
            }
        };
    }
    base.resolve(trimmed).map(|url| ensure_preview_resolution(&url))
}

/// First image referenced by page content: an image web part marker wins
/// over the first `<img>` tag.
pub fn image_from_content(html: &str, base: &SiteBase) -> Option<String> {
    if html.trim().is_empty() {
        return None;
    }
    let fragment = Html::parse_fragment(html);
    [("[data-sp-imgsrc]", "data-sp-imgsrc"), ("img[src]", "src")]
        .iter()
        .filter_map(|(css, attr)| Selector::parse(css).ok().map(|selector| (selector, *attr)))
        .find_map(|(selector, attr)| {
            fragment
                .select(&selector)
                .find_map(|element| element.value().attr(attr).and_then(|src| base.resolve(src)))
        })
        .map(|url| ensure_preview_resolution(&url))
}

/// Adds the fixed `resolution` parameter to thumbnail-service URLs that do
/// not carry one. Other URLs are returned trimmed.
pub fn ensure_preview_resolution(url: &str) -> String {
    let trimmed = url.trim();
    if !trimmed.to_ascii_lowercase().contains(PREVIEW_SERVICE_MARKER) {
        return trimmed.to_string();
    }
    if has_resolution_param(trimmed) {
        return trimmed.to_string();
    }
    let separator = if trimmed.contains('?') { '&' } else { '?' };
    format!("{trimmed}{separator}resolution={PREVIEW_RESOLUTION}")
}

fn has_resolution_param(url: &str) -> bool {
    let Some((_, query)) = url.split_once('?') else {
        return false;
    };
    query.split('&').any(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        key.eq_ignore_ascii_case("resolution")
            && !value.is_empty()
            && value.chars().all(|c| c.is_ascii_digit())
    })
}
