use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Property name → typed value container, e.g. `"Backlog": { "number": 3 }`
pub type PropertyMap = Map<String, Value>;

/// A database page as returned by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub in_trash: bool,
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Page {
    /// Archived or trashed pages are deleted accounts
    pub fn is_archived(&self) -> bool {
        self.archived || self.in_trash
    }
}

/// Body of a page update: either new property values or the archival flag
#[derive(Debug, Clone, PartialEq)]
pub enum PageUpdate {
    Properties(PropertyMap),
    Archive,
}

impl PageUpdate {
    pub fn to_body(&self) -> Value {
        match self {
            PageUpdate::Properties(properties) => json!({ "properties": properties }),
            PageUpdate::Archive => json!({ "archived": true }),
        }
    }
}
