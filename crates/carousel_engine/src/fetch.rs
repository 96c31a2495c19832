use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;
use url::Url;

use crate::classify;
use crate::discovery::{
    self, DiscoveryStrategy, ListIdentifier, ListInfo, ListQuery, SITE_PAGES_TEMPLATE,
};
use crate::record::RawRecord;
use crate::{FailureKind, FetchError};

const ODATA_ACCEPT: &str = "application/json;odata=nometadata";
const BASE_FIELDS: [&str; 8] = [
    "Id",
    "Title",
    "FileRef",
    "FileLeafRef",
    "Modified",
    "CreatedBy/Title",
    "ContentType/Name",
    "ContentTypeId",
];
/// Fields missing from some libraries; a 400 answer triggers a retry without them.
const OPTIONAL_FIELDS: [&str; 4] = [
    "BannerImageUrl",
    "PromotedState",
    "Description",
    "CanvasContent1",
];
const FILE_FIELDS: [&str; 3] = ["Name", "ServerRelativeUrl", "TimeLastModified"];
const EXPAND_FIELDS: [&str; 2] = ["CreatedBy", "ContentType"];

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    /// Page size of item queries.
    pub top: u32,
    pub bearer_token: Option<String>,
    pub site_pages_segment: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            top: 50,
            bearer_token: None,
            site_pages_segment: "SitePages".to_string(),
        }
    }
}

#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    /// Raw records of the news library, most recently modified first.
    async fn fetch_records(&self) -> Result<Vec<RawRecord>, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldSet {
    Full,
    Basic,
}

/// Reads news pages from a site's REST API, discovering the page library
/// heuristically and trying candidate lists in order.
#[derive(Debug, Clone)]
pub struct SharePointSource {
    site_url: String,
    server_relative_url: String,
    settings: FetchSettings,
    strategies: Vec<DiscoveryStrategy>,
    client: reqwest::Client,
}

impl SharePointSource {
    pub fn new(site_url: &str, settings: FetchSettings) -> Result<Self, FetchError> {
        let parsed = Url::parse(site_url.trim())
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let site_url = parsed.as_str().trim_end_matches('/').to_string();
        let server_relative_url = parsed.path().trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ODATA_ACCEPT));
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            site_url,
            server_relative_url,
            settings,
            strategies: discovery::default_strategies(),
            client,
        })
    }

    pub fn with_strategies(mut self, strategies: Vec<DiscoveryStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    async fn discover_list(&self) -> Option<ListInfo> {
        for strategy in &self.strategies {
            for query in strategy.queries() {
                let lists = match self.fetch_lists(query).await {
                    Ok(lists) => lists,
                    Err(err) => {
                        engine_debug!("Discovery via {} failed: {}", strategy.name(), err);
                        continue;
                    }
                };
                if let Some(found) = strategy.select(&lists) {
                    engine_info!(
                        "Found page library \"{}\" via {} (template {}, {} items)",
                        found.title,
                        strategy.name(),
                        found.base_template,
                        found.item_count
                    );
                    return Some(found.clone());
                }
            }
        }
        engine_warn!("No page library discovered; trying well-known list names");
        None
    }

    async fn fetch_lists(&self, query: ListQuery) -> Result<Vec<ListInfo>, FetchError> {
        let mut url = self.api_url("/_api/web/lists")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("$select", "Id,Title,BaseTemplate,ItemCount");
            if let ListQuery::BaseTemplate(template) = query {
                pairs.append_pair("$filter", &format!("BaseTemplate eq {template}"));
            }
        }
        let body = self.get_json(url).await?;
        Ok(odata_values(body)
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect())
    }

    /// Items of one candidate list. Retries once without optional fields on
    /// HTTP 400.
    async fn fetch_items(&self, list: &ListIdentifier) -> Result<Vec<Value>, FetchError> {
        let body = match self.get_json(self.items_url(list, FieldSet::Full)?).await {
            Err(err) if err.kind == FailureKind::HttpStatus(400) => {
                engine_debug!(
                    "List '{}' rejected optional fields, retrying without them",
                    list.label()
                );
                self.get_json(self.items_url(list, FieldSet::Basic)?).await?
            }
            other => other?,
        };
        Ok(odata_values(body))
    }

    /// Accepts a list unless its first item looks like an access request.
    async fn try_candidate(&self, list: &ListIdentifier) -> Result<Vec<RawRecord>, FetchError> {
        let records: Vec<RawRecord> = self
            .fetch_items(list)
            .await?
            .into_iter()
            .filter_map(RawRecord::from_value)
            .collect();

        if let Some(first) = records.first() {
            if classify::looks_like_access_requests(&first.clone().into_list_item()) {
                return Err(FetchError::new(
                    FailureKind::SourceUnavailable,
                    format!("list '{}' holds access requests", list.label()),
                ));
            }
        }
        Ok(records)
    }

    /// Reads the first site page library by id, bypassing titles.
    async fn last_resort(&self) -> Result<Vec<RawRecord>, FetchError> {
        let lists = self.fetch_lists(ListQuery::All).await?;
        let library = lists
            .into_iter()
            .find(|list| list.base_template == SITE_PAGES_TEMPLATE)
            .ok_or_else(|| {
                FetchError::new(FailureKind::SourceUnavailable, "no site pages library")
            })?;
        engine_info!(
            "Trying site pages library \"{}\" by id {}",
            library.title,
            library.id
        );
        let records = self.try_candidate(&ListIdentifier::Guid(library.id)).await?;
        if records.is_empty() {
            return Err(FetchError::new(
                FailureKind::SourceUnavailable,
                "site pages library is empty",
            ));
        }
        Ok(records)
    }

    fn api_url(&self, path: &str) -> Result<Url, FetchError> {
        Url::parse(&format!("{}{path}", self.site_url))
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn items_url(&self, list: &ListIdentifier, fields: FieldSet) -> Result<Url, FetchError> {
        let (path, prefix, extra): (String, &str, &[&str]) = match list {
            ListIdentifier::Folder(folder) => (
                format!(
                    "/_api/web/GetFolderByServerRelativeUrl('{}')/Files",
                    urlencoding::encode(&odata_quote(folder))
                ),
                "ListItemAllFields/",
                &FILE_FIELDS,
            ),
            ListIdentifier::Guid(id) => (format!("/_api/web/lists(guid'{id}')/items"), "", &[]),
            ListIdentifier::Title(title) => (
                format!(
                    "/_api/web/lists/getbytitle('{}')/items",
                    urlencoding::encode(&odata_quote(title))
                ),
                "",
                &[],
            ),
        };

        let optional: &[&str] = match fields {
            FieldSet::Full => &OPTIONAL_FIELDS,
            FieldSet::Basic => &[],
        };
        let select = BASE_FIELDS
            .iter()
            .chain(optional)
            .map(|field| format!("{prefix}{field}"))
            .chain(extra.iter().map(|field| field.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        let expand = EXPAND_FIELDS
            .iter()
            .map(|field| format!("{prefix}{field}"))
            .collect::<Vec<_>>()
            .join(",");

        let mut url = self.api_url(&path)?;
        url.query_pairs_mut()
            .append_pair("$select", &select)
            .append_pair("$expand", &expand)
            .append_pair("$orderby", &format!("{prefix}Modified desc"))
            .append_pair("$top", &self.settings.top.to_string());
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, FetchError> {
        engine_debug!("GET {}", url);
        let mut request = self.client.get(url);
        if let Some(token) = self.settings.bearer_token.as_deref() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::MalformedBody, err.to_string()))
    }
}

#[async_trait::async_trait]
impl NewsSource for SharePointSource {
    async fn fetch_records(&self) -> Result<Vec<RawRecord>, FetchError> {
        let discovered = self.discover_list().await;
        let candidates = discovery::candidate_identifiers(
            &self.server_relative_url,
            &self.settings.site_pages_segment,
            discovered.as_ref(),
        );

        for candidate in &candidates {
            engine_debug!("Trying list '{}'", candidate.label());
            match self.try_candidate(candidate).await {
                Ok(records) => {
                    engine_info!(
                        "Read {} records from list '{}'",
                        records.len(),
                        candidate.label()
                    );
                    return Ok(records);
                }
                Err(err) => engine_debug!("List '{}' unusable: {}", candidate.label(), err),
            }
        }

        match self.last_resort().await {
            Ok(records) => Ok(records),
            Err(err) => {
                engine_warn!("No readable news list on {}: {}", self.site_url, err);
                Err(FetchError::new(
                    FailureKind::SourceUnavailable,
                    format!("could not find a page library on {}", self.site_url),
                ))
            }
        }
    }
}

/// OData collections arrive as `{"value": [...]}`, or `{"d": {"results": [...]}}`
/// in verbose mode.
fn odata_values(body: Value) -> Vec<Value> {
    match body {
        Value::Object(mut map) => match map.remove("value") {
            Some(Value::Array(values)) => values,
            _ => match map.remove("d") {
                Some(Value::Object(mut d)) => match d.remove("results") {
                    Some(Value::Array(values)) => values,
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            },
        },
        _ => Vec::new(),
    }
}

fn odata_quote(value: &str) -> String {
    value.replace('\'', "''")
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> SharePointSource {
        SharePointSource::new("https://contoso.example/sites/news/", FetchSettings::default())
            .unwrap()
    }

    #[test]
    fn site_address_is_split() {
        let source = source();
        assert_eq!(source.site_url(), "https://contoso.example/sites/news");
        assert_eq!(source.server_relative_url, "/sites/news");
    }

    #[test]
    fn invalid_site_url_is_rejected() {
        let err = SharePointSource::new("not a url", FetchSettings::default()).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }

    #[test]
    fn folder_items_url_prefixes_fields() {
        let url = source()
            .items_url(
                &ListIdentifier::Folder("/sites/news/SitePages".to_string()),
                FieldSet::Basic,
            )
            .unwrap();
        assert!(url
            .path()
            .ends_with("GetFolderByServerRelativeUrl('%2Fsites%2Fnews%2FSitePages')/Files"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let select = &pairs.iter().find(|(k, _)| k == "$select").unwrap().1;
        assert!(select.starts_with("ListItemAllFields/Id,ListItemAllFields/Title"));
        assert!(select.ends_with("Name,ServerRelativeUrl,TimeLastModified"));
        assert!(!select.contains("BannerImageUrl"));
        assert!(pairs.contains(&(
            "$orderby".to_string(),
            "ListItemAllFields/Modified desc".to_string()
        )));
    }

    #[test]
    fn title_items_url_includes_optional_fields() {
        let url = source()
            .items_url(&ListIdentifier::Title("Site Pages".to_string()), FieldSet::Full)
            .unwrap();
        assert!(url.path().contains("getbytitle('Site%20Pages')"));
        let select = url
            .query_pairs()
            .find(|(k, _)| k == "$select")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(select.contains("BannerImageUrl,PromotedState,Description,CanvasContent1"));
        assert!(url.query_pairs().any(|(k, v)| k == "$top" && v == "50"));
    }

    #[test]
    fn odata_collections_in_both_modes() {
        assert_eq!(odata_values(json!({"value": [1, 2]})).len(), 2);
        assert_eq!(odata_values(json!({"d": {"results": [1]}})).len(), 1);
        assert!(odata_values(json!({"error": "x"})).is_empty());
        assert!(odata_values(json!([1])).is_empty());
    }
}
