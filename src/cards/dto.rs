use serde::{Deserialize, Serialize};

/// One checklist entry. Decoding tolerates partial and unknown fields,
/// import documents in particular carry whatever the source had.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

fn default_card_type() -> String {
    "task".into()
}

fn default_card_status() -> String {
    "idea".into()
}

#[derive(Debug, Deserialize)]
pub struct CardCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_card_type")]
    pub card_type: String,
    #[serde(default = "default_card_status")]
    pub status: String,
    pub board_id: String,
    #[serde(default)]
    pub position_x: f64,
    #[serde(default)]
    pub position_y: f64,
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

/// Partial update: null and absent are indistinguishable, so a field
/// cannot be nulled out through this payload.
#[derive(Debug, Default, Deserialize)]
pub struct CardUpdate {
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

#[derive(Debug, Deserialize)]
pub struct CardListQuery {
    pub board_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default)]
    pub board_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_fills_defaults() {
        let card: CardCreate =
            serde_json::from_str(r#"{"title": "Ship it", "board_id": "board_abc123def456"}"#)
                .expect("decode");
        assert_eq!(card.card_type, "task");
        assert_eq!(card.status, "idea");
        assert_eq!(card.position_x, 0.0);
        assert_eq!(card.position_y, 0.0);
        assert!(card.priority.is_none());
        assert!(card.assignees.is_none());
        assert!(card.due_date.is_none());
    }

    #[test]
    fn update_decodes_partial_payload() {
        let upd: CardUpdate = serde_json::from_str(r#"{"priority": "high"}"#).expect("decode");
        assert_eq!(upd.priority.as_deref(), Some("high"));
        assert!(upd.title.is_none());
        assert!(upd.tags.is_none());
        assert!(upd.checklist.is_none());
    }

    #[test]
    fn checklist_items_tolerate_extra_fields() {
        let item: ChecklistItem =
            serde_json::from_str(r#"{"text": "write tests", "done": true, "assignee": "u1"}"#)
                .expect("decode");
        assert_eq!(item.text, "write tests");
        assert!(item.done);
    }
}
