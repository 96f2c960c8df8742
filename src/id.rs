use uuid::Uuid;

/// Opaque entity identifier: a type prefix plus 12 hex chars, e.g.
/// `card_9f8e7d6c5b4a`.
pub fn new_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &hex[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_prefix_and_fixed_width() {
        let id = new_id("card");
        assert!(id.starts_with("card_"));
        assert_eq!(id.len(), "card_".len() + 12);
        assert!(id["card_".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn successive_ids_differ() {
        assert_ne!(new_id("ws"), new_id("ws"));
    }
}
