use chrono::{DateTime, Utc};

pub type ItemId = i64;

/// A fully resolved news entry, ready for rendering.
///
/// Every field is populated by the normalizer; renderers never see a
/// missing title, image or link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub page_url: String,
    pub published_date: DateTime<Utc>,
    pub author: String,
    pub category: String,
}
