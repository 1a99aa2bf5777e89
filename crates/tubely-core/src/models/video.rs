use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A video record owned by a single user.
///
/// `thumbnail_url` and `video_url` stay empty until the matching upload succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
}

impl Video {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Request body for creating a draft video
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateVideoParams {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_urls_are_omitted_from_json() {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            thumbnail_url: None,
            video_url: None,
            title: "Boots".to_string(),
            description: String::new(),
            user_id: Uuid::new_v4(),
        };
        let json = serde_json::to_value(&video).unwrap();
        assert!(json.get("thumbnail_url").is_none());
        assert!(json.get("video_url").is_none());
        assert_eq!(json["title"], "Boots");
    }

    #[test]
    fn description_defaults_to_empty() {
        let params: CreateVideoParams = serde_json::from_str(r#"{"title":"Boots"}"#).unwrap();
        assert_eq!(params.description, "");
    }
}
