use serde::Deserialize;

use crate::boards::repo::Status;

#[derive(Debug, Deserialize)]
pub struct BoardCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub workspace_id: String,
}

/// Partial update: only supplied non-null fields overwrite. The
/// identifying and ownership fields are not updatable.
#[derive(Debug, Deserialize)]
pub struct BoardUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub statuses: Option<Vec<Status>>,
}

#[derive(Debug, Deserialize)]
pub struct BoardListQuery {
    #[serde(default)]
    pub workspace_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_ignores_protected_and_unknown_fields() {
        let upd: BoardUpdate = serde_json::from_str(
            r#"{"name": "Renamed", "board_id": "board_x", "owner_id": "user_y"}"#,
        )
        .expect("decode");
        assert_eq!(upd.name.as_deref(), Some("Renamed"));
        assert!(upd.description.is_none());
        assert!(upd.statuses.is_none());
    }
}
