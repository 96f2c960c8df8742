use serde::Deserialize;

/// Null and absent both fall back to the defaults, like every create
/// payload here.
#[derive(Debug, Deserialize)]
pub struct WorkspaceCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_tolerates_minimal_and_unknown_fields() {
        let ws: WorkspaceCreate =
            serde_json::from_str(r#"{"name": "Q3", "icon": "rocket"}"#).expect("decode");
        assert_eq!(ws.name, "Q3");
        assert!(ws.description.is_none());
        assert!(ws.color.is_none());
    }

    #[test]
    fn create_tolerates_explicit_nulls() {
        let ws: WorkspaceCreate =
            serde_json::from_str(r#"{"name": "Q3", "description": null, "color": null}"#)
                .expect("decode");
        assert!(ws.description.is_none());
    }
}
