//! Locating the page library that holds news.
//!
//! Discovery is an ordered list of strategies tried until one yields a
//! list. Each strategy names the list queries it needs and how to pick a
//! list from the answer, so a new strategy is one more entry in
//! [`default_strategies`].

use serde::Deserialize;

/// Site page library templates, most specific first.
pub const PAGE_LIBRARY_TEMPLATES: [i64; 3] = [160, 850, 3415];
pub const SITE_PAGES_TEMPLATE: i64 = 160;

const NEWS_LIST_TOKEN: &str = "neuigkeit";
const TEMPLATE_EXTENSION_TOKENS: [&str; 2] = ["vorlagenerweiterung", "template extension"];
const PREFERRED_TITLE_TOKENS: [&str; 5] = ["neuigkeit", "news", "seite", "page", "nachricht"];

/// Well-known library titles tried after any discovered list.
pub const FALLBACK_LIST_TITLES: [&str; 7] = [
    "Neuigkeiten",
    "SitePages",
    "Site Pages",
    "Seiten",
    "Webseiten",
    "Modern Pages",
    "Moderne Seiten",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub base_template: i64,
    #[serde(default)]
    pub item_count: i64,
}

/// One request against the lists endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListQuery {
    All,
    BaseTemplate(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// A non-empty list titled like the news library.
    NamedList,
    /// Server-side filter per template, in order.
    BaseTemplate(Vec<i64>),
    /// All lists, filtered by template on the client.
    ManualFilter(Vec<i64>),
}

pub fn default_strategies() -> Vec<DiscoveryStrategy> {
    vec![
        DiscoveryStrategy::NamedList,
        DiscoveryStrategy::BaseTemplate(PAGE_LIBRARY_TEMPLATES.to_vec()),
        DiscoveryStrategy::ManualFilter(PAGE_LIBRARY_TEMPLATES.to_vec()),
    ]
}

impl DiscoveryStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            DiscoveryStrategy::NamedList => "named list",
            DiscoveryStrategy::BaseTemplate(_) => "base template",
            DiscoveryStrategy::ManualFilter(_) => "manual filter",
        }
    }

    pub fn queries(&self) -> Vec<ListQuery> {
        match self {
            DiscoveryStrategy::NamedList | DiscoveryStrategy::ManualFilter(_) => {
                vec![ListQuery::All]
            }
            DiscoveryStrategy::BaseTemplate(templates) => {
                templates.iter().copied().map(ListQuery::BaseTemplate).collect()
            }
        }
    }

    /// Picks a list from the answer to one of [`Self::queries`].
    pub fn select<'a>(&self, lists: &'a [ListInfo]) -> Option<&'a ListInfo> {
        match self {
            DiscoveryStrategy::NamedList => lists.iter().find(|list| {
                let title = list.title.to_lowercase();
                title.contains(NEWS_LIST_TOKEN) && list.item_count > 0
            }),
            DiscoveryStrategy::BaseTemplate(templates)
            | DiscoveryStrategy::ManualFilter(templates) => {
                pick_page_library(lists, templates)
            }
        }
    }
}

fn pick_page_library<'a>(lists: &'a [ListInfo], templates: &[i64]) -> Option<&'a ListInfo> {
    let valid: Vec<&ListInfo> = lists
        .iter()
        .filter(|list| templates.contains(&list.base_template))
        .filter(|list| {
            let title = list.title.to_lowercase();
            !TEMPLATE_EXTENSION_TOKENS
                .iter()
                .any(|token| title.contains(token))
        })
        .filter(|list| list.item_count > 0)
        .collect();

    valid
        .iter()
        .find(|list| {
            let title = list.title.to_lowercase();
            PREFERRED_TITLE_TOKENS
                .iter()
                .any(|token| title.contains(token))
        })
        .or_else(|| valid.first())
        .copied()
}

/// Ways to address a list when reading its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListIdentifier {
    /// Server-relative folder; read through its file listing.
    Folder(String),
    Guid(String),
    Title(String),
}

impl ListIdentifier {
    pub fn label(&self) -> &str {
        match self {
            ListIdentifier::Folder(value)
            | ListIdentifier::Guid(value)
            | ListIdentifier::Title(value) => value,
        }
    }
}

/// Candidate order: the page folder, the discovered list by id and by
/// title, then well-known titles.
pub fn candidate_identifiers(
    server_relative_url: &str,
    site_pages_segment: &str,
    discovered: Option<&ListInfo>,
) -> Vec<ListIdentifier> {
    let mut candidates = vec![ListIdentifier::Folder(format!(
        "{server_relative_url}/{site_pages_segment}"
    ))];
    if let Some(list) = discovered {
        candidates.push(ListIdentifier::Guid(list.id.clone()));
        if !list.title.trim().is_empty() {
            candidates.push(ListIdentifier::Title(list.title.clone()));
        }
    }
    candidates.extend(
        FALLBACK_LIST_TITLES
            .iter()
            .map(|title| ListIdentifier::Title(title.to_string())),
    );
    candidates
}
