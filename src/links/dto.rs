use serde::Deserialize;

fn default_link_type() -> String {
    "related_to".into()
}

fn default_line_style() -> String {
    "solid".into()
}

#[derive(Debug, Deserialize)]
pub struct LinkCreate {
    pub source_card_id: String,
    pub target_card_id: String,
    #[serde(default = "default_link_type")]
    pub link_type: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_line_style")]
    pub line_style: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkListQuery {
    pub board_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_fills_defaults() {
        let link: LinkCreate = serde_json::from_str(
            r#"{"source_card_id": "card_a", "target_card_id": "card_b"}"#,
        )
        .expect("decode");
        assert_eq!(link.link_type, "related_to");
        assert_eq!(link.line_style, "solid");
        assert!(link.label.is_none());
        assert!(link.color.is_none());
    }
}
