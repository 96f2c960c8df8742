use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::boards::repo::{Board, Status};
use crate::cards::dto::ChecklistItem;
use crate::cards::repo::Card;
use crate::links::repo::Link;

/// Self-contained board document. Identifiers are exported as-is;
/// remapping happens on import only.
#[derive(Debug, Serialize)]
pub struct BoardExport {
    pub board: Board,
    pub cards: Vec<Card>,
    pub links: Vec<Link>,
    #[serde(with = "time::serde::rfc3339")]
    pub exported_at: OffsetDateTime,
}

/// Import payloads come from files the client may have edited: every
/// field is optional, unknown fields are discarded.
#[derive(Debug, Default, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub board: BoardImport,
    #[serde(default)]
    pub cards: Vec<CardImport>,
    #[serde(default)]
    pub links: Vec<LinkImport>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoardImport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub statuses: Option<Vec<Status>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CardImport {
    #[serde(default)]
    pub card_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub position_x: Option<f64>,
    #[serde(default)]
    pub position_y: Option<f64>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assignees: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub checklist: Option<Vec<ChecklistItem>>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LinkImport {
    #[serde(default)]
    pub source_card_id: Option<String>,
    #[serde(default)]
    pub target_card_id: Option<String>,
    #[serde(default)]
    pub link_type: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub line_style: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_request_tolerates_sparse_documents() {
        let req: ImportRequest = serde_json::from_str(
            r#"{
                "workspace_id": "ws_abc123def456",
                "exported_at": "2026-01-01T00:00:00Z",
                "cards": [{"card_id": "card_old1", "title": "A", "effort": 5}]
            }"#,
        )
        .expect("decode");
        assert_eq!(req.workspace_id.as_deref(), Some("ws_abc123def456"));
        assert!(req.board.name.is_none());
        assert_eq!(req.cards.len(), 1);
        assert!(req.links.is_empty());
    }
}
