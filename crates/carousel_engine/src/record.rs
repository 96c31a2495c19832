//! Loosely-typed list records as returned by the site's REST API.
//!
//! Two shapes occur in practice: list items queried directly, and file
//! entries from a folder listing that carry the list item under
//! `ListItemAllFields`. Both collapse into one [`ListItem`] before the
//! normalization pipeline runs.

use carousel_core::ItemId;
use engine_logging::engine_debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes an optional field, mapping a value of the wrong JSON type to
/// `None` so one odd column never rejects the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PersonRef {
    #[serde(rename = "Title", default, deserialize_with = "lenient")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentTypeRef {
    #[serde(rename = "Name", default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// Content type ids arrive either as a plain string or wrapped in
/// `{"StringValue": "..."}` depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ContentTypeId {
    Plain(String),
    Wrapped {
        #[serde(rename = "StringValue")]
        string_value: String,
    },
}

impl ContentTypeId {
    pub fn as_str(&self) -> &str {
        match self {
            ContentTypeId::Plain(value) => value,
            ContentTypeId::Wrapped { string_value } => string_value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListItem {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ItemId>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub file_ref: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub file_leaf_ref: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub modified: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<PersonRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_by: Option<PersonRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub content_type: Option<ContentTypeRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub content_type_id: Option<ContentTypeId>,
    /// String, JSON-encoded string or object; resolved by the image module.
    pub banner_image_url: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub canvas_content1: Option<String>,
}

impl ListItem {
    pub fn content_type_name(&self) -> &str {
        self.content_type
            .as_ref()
            .and_then(|ct| ct.name.as_deref())
            .unwrap_or_default()
    }

    pub fn content_type_id(&self) -> &str {
        self.content_type_id
            .as_ref()
            .map(ContentTypeId::as_str)
            .unwrap_or_default()
    }

    pub fn title_text(&self) -> &str {
        self.title.as_deref().map(str::trim).unwrap_or_default()
    }

    pub fn file_leaf(&self) -> &str {
        self.file_leaf_ref.as_deref().map(str::trim).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileEntry {
    pub list_item_all_fields: ListItem,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub server_relative_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub time_last_modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawRecord {
    Wrapped(FileEntry),
    Direct(ListItem),
}

impl RawRecord {
    /// Parses one element of an OData `value` array. Non-object values are
    /// dropped.
    pub fn from_value(value: Value) -> Option<Self> {
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                engine_debug!("Skipping unreadable record: {}", err);
                None
            }
        }
    }

    /// Collapses either shape into the canonical list item.
    pub fn into_list_item(self) -> ListItem {
        match self {
            RawRecord::Direct(item) => item,
            RawRecord::Wrapped(entry) => {
                let FileEntry {
                    list_item_all_fields: mut item,
                    name,
                    server_relative_url,
                    time_last_modified,
                } = entry;
                item.title = non_blank(item.title).or_else(|| name.clone());
                item.file_ref = non_blank(item.file_ref).or(server_relative_url);
                item.file_leaf_ref = non_blank(item.file_leaf_ref).or(name);
                item.modified = non_blank(item.modified).or(time_last_modified);
                if item.created_by.is_none() {
                    item.created_by = item.author.clone();
                }
                item
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn direct_record_parses_pascal_case_fields() {
        let record = RawRecord::from_value(json!({
            "Id": 4,
            "Title": "Sommerfest",
            "FileLeafRef": "Sommerfest.aspx",
            "ContentType": {"Name": "Artikelseite"},
            "ContentTypeId": {"StringValue": "0x0101009D1CB255DA76424F860D91F20E6C4118AB"},
            "CreatedBy": {"Title": "Jo Doe"}
        }))
        .unwrap();
        let item = record.into_list_item();
        assert_eq!(item.id, Some(4));
        assert_eq!(item.content_type_name(), "Artikelseite");
        assert!(item.content_type_id().starts_with("0x0101009D"));
        assert_eq!(item.created_by.unwrap().title.as_deref(), Some("Jo Doe"));
    }

    #[test]
    fn wrapped_record_collapses_file_fields() {
        let record = RawRecord::from_value(json!({
            "ListItemAllFields": {"Id": 9, "Author": {"Title": "Sam"}},
            "Name": "Betriebsausflug.aspx",
            "ServerRelativeUrl": "/sites/news/SitePages/Betriebsausflug.aspx",
            "TimeLastModified": "2025-05-01T08:00:00Z"
        }))
        .unwrap();
        assert!(matches!(record, RawRecord::Wrapped(_)));

        let item = record.into_list_item();
        assert_eq!(item.id, Some(9));
        assert_eq!(item.title.as_deref(), Some("Betriebsausflug.aspx"));
        assert_eq!(item.file_leaf_ref.as_deref(), Some("Betriebsausflug.aspx"));
        assert_eq!(
            item.file_ref.as_deref(),
            Some("/sites/news/SitePages/Betriebsausflug.aspx")
        );
        assert_eq!(item.modified.as_deref(), Some("2025-05-01T08:00:00Z"));
        assert_eq!(item.created_by.unwrap().title.as_deref(), Some("Sam"));
    }

    #[test]
    fn mismatched_field_types_degrade_to_absent() {
        let record = RawRecord::from_value(json!({
            "Id": 1,
            "Title": "Sommerfest",
            "Description": {"x": 1},
            "CanvasContent1": 17,
            "PromotedState": 2.0,
            "CreatedBy": "Jo Doe",
            "ContentType": {"Name": ["News Post"]}
        }))
        .unwrap();
        let item = record.into_list_item();
        assert_eq!(item.id, Some(1));
        assert_eq!(item.title_text(), "Sommerfest");
        assert_eq!(item.description, None);
        assert_eq!(item.canvas_content1, None);
        assert_eq!(item.created_by, None);
        assert_eq!(item.content_type_name(), "");
    }

    #[test]
    fn non_object_values_are_dropped() {
        assert!(RawRecord::from_value(json!("oops")).is_none());
        assert!(RawRecord::from_value(json!(42)).is_none());
    }
}
