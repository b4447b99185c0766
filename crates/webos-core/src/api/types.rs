//! Request and response bodies of the desktop and sync endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{ConflictStrategy, FolderRef, Icon, IconUpdate, SyncSettings};

/// `{ data: {...} }` wrapper used by the sync endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Listings arrive either paginated or as a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Paginated { results: Vec<T> },
    Plain(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paginated { results } => results,
            Self::Plain(items) => items,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MoveToFolderBody {
    pub parent_id: FolderRef,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenameBody<'a> {
    pub name: &'a str,
}

/// A folder to create at `(x, y)` inside `parent_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFolder {
    pub name: String,
    pub x: i64,
    pub y: i64,
    pub parent_id: FolderRef,
}

/// A link icon to create at `(x, y)` inside `parent_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLink {
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_class: Option<String>,
    pub x: i64,
    pub y: i64,
    pub parent_id: FolderRef,
}

#[derive(Debug, Serialize)]
pub(crate) struct PositionBody {
    pub x: i64,
    pub y: i64,
}

/// One batch of queued icon updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushRequest {
    pub conflict_strategy: ConflictStrategy,
    pub icons: Vec<IconUpdate>,
}

/// Server tally of an accepted push
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushReport {
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub server_time: Option<DateTime<Utc>>,
}

/// Ask for everything changed after `since` (everything when `None`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    pub since: Option<DateTime<Utc>>,
}

/// What a pull returns.
///
/// `icons` absent means "no icon data"; present (even empty) means the
/// list replaces the local cache.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PullDataset {
    #[serde(default)]
    pub icons: Option<Vec<Icon>>,
    #[serde(default)]
    pub resources: Vec<Value>,
    #[serde(default)]
    pub categories: Vec<Value>,
    #[serde(default)]
    pub server_time: Option<DateTime<Utc>>,
}

/// Server copy of a scope's sync preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default)]
    pub upload_enabled: bool,
    #[serde(default)]
    pub conflict_strategy: ConflictStrategy,
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// Body of a settings update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteSettingsUpdate {
    pub upload_enabled: bool,
    pub conflict_strategy: ConflictStrategy,
}

impl From<&SyncSettings> for RemoteSettingsUpdate {
    fn from(settings: &SyncSettings) -> Self {
        Self {
            upload_enabled: settings.upload_enabled,
            conflict_strategy: settings.conflict_strategy.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, Icon, IconId};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn icon_list_accepts_both_shapes() {
        let paginated: ListEnvelope<Icon> = serde_json::from_value(json!({
            "count": 1,
            "next": null,
            "results": [{"id": 1, "title": "A"}]
        }))
        .unwrap();
        assert_eq!(paginated.into_items().len(), 1);

        let plain: ListEnvelope<Icon> =
            serde_json::from_value(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(plain.into_items().len(), 2);
    }

    #[test]
    fn create_bodies_wire_shape() {
        let folder = NewFolder {
            name: "Projects".to_string(),
            x: 40,
            y: 60,
            parent_id: FolderRef::Root,
        };
        assert_eq!(
            serde_json::to_value(&folder).unwrap(),
            json!({"name": "Projects", "x": 40, "y": 60, "parent_id": "root"})
        );

        let link = NewLink {
            title: "Mail".to_string(),
            link: "https://mail.example.com".to_string(),
            icon_class: None,
            x: 0,
            y: 0,
            parent_id: FolderRef::Category(CategoryId::new(3)),
        };
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!({"title": "Mail", "link": "https://mail.example.com",
                   "x": 0, "y": 0, "parent_id": 3})
        );
    }

    #[test]
    fn pull_dataset_distinguishes_missing_and_empty_icons() {
        let missing: DataEnvelope<PullDataset> =
            serde_json::from_value(json!({"success": true, "data": {"server_time": null}}))
                .unwrap();
        assert_eq!(missing.data.unwrap().icons, None);

        let empty: DataEnvelope<PullDataset> =
            serde_json::from_value(json!({"data": {"icons": []}})).unwrap();
        assert_eq!(empty.data.unwrap().icons, Some(Vec::new()));

        let no_data: DataEnvelope<PullDataset> =
            serde_json::from_value(json!({"success": true})).unwrap();
        assert!(no_data.data.is_none());
    }

    #[test]
    fn pull_dataset_parses_django_timestamps() {
        let dataset: PullDataset = serde_json::from_value(json!({
            "icons": [],
            "server_time": "2024-01-01T08:30:00.123456+08:00"
        }))
        .unwrap();
        assert_eq!(
            dataset.server_time.unwrap().to_rfc3339(),
            "2024-01-01T00:30:00.123456+00:00"
        );
    }

    #[test]
    fn push_request_wire_shape() {
        let request = PushRequest {
            conflict_strategy: ConflictStrategy::ServerWins,
            icons: vec![IconUpdate {
                id: IconId::new(7),
                x: 10,
                y: 20,
                updated_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "conflict_strategy": "server_wins",
                "icons": [{"id": 7, "x": 10, "y": 20, "updated_at": "2024-01-01T00:00:00Z"}]
            })
        );
        assert_eq!(
            serde_json::to_value(PullRequest { since: None }).unwrap(),
            json!({"since": null})
        );
    }
}
