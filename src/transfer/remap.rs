use std::collections::HashMap;

use sqlx::types::Json;
use time::OffsetDateTime;

use crate::cards::repo::Card;
use crate::id::new_id;
use crate::links::repo::{Link, DEFAULT_LINK_COLOR};
use crate::transfer::dto::{CardImport, LinkImport};

/// Builds the imported cards under fresh identifiers and the old→new id
/// map used to rewire links. Every card is owned by the importer and
/// stamped with the one shared import timestamp.
pub fn remap_cards(
    cards: &[CardImport],
    board_id: &str,
    owner_id: &str,
    now: OffsetDateTime,
) -> (Vec<Card>, HashMap<String, String>) {
    let mut id_map = HashMap::with_capacity(cards.len());
    let mut out = Vec::with_capacity(cards.len());

    for card in cards {
        let card_id = new_id("card");
        if let Some(old_id) = &card.card_id {
            id_map.insert(old_id.clone(), card_id.clone());
        }
        out.push(Card {
            card_id,
            title: card.title.clone().unwrap_or_default(),
            description: card.description.clone().unwrap_or_default(),
            card_type: card.card_type.clone().unwrap_or_else(|| "task".into()),
            status: card.status.clone().unwrap_or_else(|| "idea".into()),
            board_id: board_id.to_string(),
            position_x: card.position_x.unwrap_or(0.0),
            position_y: card.position_y.unwrap_or(0.0),
            priority: card.priority.clone().unwrap_or_else(|| "medium".into()),
            assignees: Json(card.assignees.clone().unwrap_or_default()),
            tags: Json(card.tags.clone().unwrap_or_default()),
            due_date: card.due_date.clone(),
            checklist: Json(card.checklist.clone().unwrap_or_default()),
            color: card.color.clone(),
            created_by: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        });
    }

    (out, id_map)
}

/// Rewires links through the id map. A link whose source or target is
/// not among the imported cards is dropped silently, with no error and
/// no count reported.
pub fn remap_links(
    links: &[LinkImport],
    id_map: &HashMap<String, String>,
    board_id: &str,
    owner_id: &str,
    now: OffsetDateTime,
) -> Vec<Link> {
    links
        .iter()
        .filter_map(|link| {
            let source = link.source_card_id.as_ref().and_then(|id| id_map.get(id))?;
            let target = link.target_card_id.as_ref().and_then(|id| id_map.get(id))?;
            Some(Link {
                link_id: new_id("link"),
                source_card_id: source.clone(),
                target_card_id: target.clone(),
                link_type: link.link_type.clone().unwrap_or_else(|| "related_to".into()),
                label: link.label.clone(),
                color: link.color.clone().unwrap_or_else(|| DEFAULT_LINK_COLOR.into()),
                line_style: link.line_style.clone().unwrap_or_else(|| "solid".into()),
                board_id: board_id.to_string(),
                created_by: owner_id.to_string(),
                created_at: now,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import_card(id: &str, title: &str) -> CardImport {
        CardImport {
            card_id: Some(id.into()),
            title: Some(title.into()),
            ..CardImport::default()
        }
    }

    fn import_link(source: &str, target: &str) -> LinkImport {
        LinkImport {
            source_card_id: Some(source.into()),
            target_card_id: Some(target.into()),
            link_type: Some("depends_on".into()),
            ..LinkImport::default()
        }
    }

    fn now() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    #[test]
    fn cards_get_fresh_ids_and_importer_ownership() {
        let input = vec![import_card("card_old1", "A"), import_card("card_old2", "B")];
        let (cards, id_map) = remap_cards(&input, "board_new", "user_importer", now());

        assert_eq!(cards.len(), 2);
        assert_eq!(id_map.len(), 2);
        for card in &cards {
            assert_ne!(card.card_id, "card_old1");
            assert_ne!(card.card_id, "card_old2");
            assert_eq!(card.board_id, "board_new");
            assert_eq!(card.created_by, "user_importer");
            assert_eq!(card.created_at, now());
            assert_eq!(card.updated_at, now());
        }
        assert_eq!(id_map["card_old1"], cards[0].card_id);
        assert_eq!(id_map["card_old2"], cards[1].card_id);
    }

    #[test]
    fn card_defaults_fill_missing_fields() {
        let input = vec![CardImport::default()];
        let (cards, id_map) = remap_cards(&input, "board_new", "user_importer", now());

        let card = &cards[0];
        assert_eq!(card.card_type, "task");
        assert_eq!(card.status, "idea");
        assert_eq!(card.priority, "medium");
        assert_eq!((card.position_x, card.position_y), (0.0, 0.0));
        assert!(card.assignees.0.is_empty());
        assert!(card.tags.0.is_empty());
        assert!(card.checklist.0.is_empty());
        // No old id to remember.
        assert!(id_map.is_empty());
    }

    #[test]
    fn links_are_rewired_to_new_card_ids() {
        let input = vec![import_card("card_old1", "A"), import_card("card_old2", "B")];
        let (cards, id_map) = remap_cards(&input, "board_new", "user_importer", now());
        let links = remap_links(
            &[import_link("card_old1", "card_old2")],
            &id_map,
            "board_new",
            "user_importer",
            now(),
        );

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].source_card_id, cards[0].card_id);
        assert_eq!(links[0].target_card_id, cards[1].card_id);
        assert_eq!(links[0].link_type, "depends_on");
        assert_eq!(links[0].board_id, "board_new");
        assert_eq!(links[0].created_by, "user_importer");
    }

    #[test]
    fn dangling_links_are_dropped_silently() {
        let input = vec![import_card("card_old1", "A")];
        let (_, id_map) = remap_cards(&input, "board_new", "user_importer", now());
        let links = remap_links(
            &[
                import_link("card_old1", "card_absent"),
                import_link("card_absent", "card_old1"),
                LinkImport::default(),
            ],
            &id_map,
            "board_new",
            "user_importer",
            now(),
        );
        assert!(links.is_empty());
    }

    #[test]
    fn link_defaults_fill_missing_fields() {
        let input = vec![import_card("card_old1", "A"), import_card("card_old2", "B")];
        let (_, id_map) = remap_cards(&input, "board_new", "user_importer", now());
        let links = remap_links(
            &[LinkImport {
                source_card_id: Some("card_old1".into()),
                target_card_id: Some("card_old2".into()),
                ..LinkImport::default()
            }],
            &id_map,
            "board_new",
            "user_importer",
            now(),
        );
        assert_eq!(links[0].link_type, "related_to");
        assert_eq!(links[0].line_style, "solid");
        assert_eq!(links[0].color, DEFAULT_LINK_COLOR);
        assert!(links[0].label.is_none());
    }
}
