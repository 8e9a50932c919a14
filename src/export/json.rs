//! JSON import/export module for review cards.
//! Saves cards to JSON files, loads them back as new cards, and reads card
//! batches out of generated text.

use crate::error::{Error, Result};
use crate::models::{NewCard, ReviewCard};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Card as written to an export file
#[derive(Serialize, Deserialize)]
struct ExportedCard {
    front: String,
    back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_review_date: Option<NaiveDate>,
}

/// Exports cards to a JSON file at the specified path.
pub fn export_cards_to_path(cards: &[ReviewCard], path: &Path) -> Result<()> {
    let exported: Vec<ExportedCard> = cards
        .iter()
        .map(|card| ExportedCard {
            front: card.front.clone(),
            back: card.back.clone(),
            interval: Some(card.interval),
            next_review_date: Some(card.next_review_date),
        })
        .collect();

    let json_string = serde_json::to_string_pretty(&exported)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;

    tracing::info!("Exported {} cards to {}", cards.len(), path.display());
    Ok(())
}

/// Imports cards from a JSON file.
/// Scheduling fields in the file are ignored; imported cards start over.
pub fn import_cards(path: &Path) -> Result<Vec<NewCard>> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let exported: Vec<ExportedCard> = serde_json::from_str(&contents)?;
    let cards: Vec<NewCard> = exported
        .into_iter()
        .map(|card| NewCard::new(card.front, card.back))
        .collect();

    tracing::info!("Read {} cards from {}", cards.len(), path.display());
    Ok(cards)
}

/// Parses a `[{"front": ..., "back": ...}]` batch embedded in free text,
/// such as a model reply wrapped in prose or a code fence.
pub fn parse_card_batch(text: &str) -> Result<Vec<NewCard>> {
    let start = text.find('[');
    let end = text.rfind(']');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => return Err(Error::invalid("no JSON array found in text")),
    };

    let cards: Vec<NewCard> = serde_json::from_str(json)?;
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn create_test_cards() -> Vec<ReviewCard> {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        vec![
            ReviewCard {
                id: 1,
                owner_id: "local".to_string(),
                front: "hello".to_string(),
                back: "olá".to_string(),
                interval: 3,
                next_review_date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
                version: 1,
                created_at: today,
            },
            ReviewCard {
                id: 2,
                owner_id: "local".to_string(),
                front: "goodbye".to_string(),
                back: "tchau".to_string(),
                interval: 1,
                next_review_date: today,
                version: 0,
                created_at: today,
            },
        ]
    }

    #[test]
    fn test_export_cards_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        export_cards_to_path(&create_test_cards(), &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"next_review_date\": \"2024-01-04\""));
        assert!(!contents.contains("owner_id"));
    }

    #[test]
    fn test_export_then_import_keeps_text_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");

        export_cards_to_path(&create_test_cards(), &path).unwrap();
        let imported = import_cards(&path).unwrap();

        assert_eq!(
            imported,
            vec![NewCard::new("hello", "olá"), NewCard::new("goodbye", "tchau")]
        );
    }

    #[test]
    fn test_import_minimal_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.json");
        fs::write(&path, r#"[{"front": "test term", "back": "test definition"}]"#).unwrap();

        let cards = import_cards(&path).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "test term");
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_cards(Path::new("nonexistent_file_xyz123.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(import_cards(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_card_batch_from_fenced_reply() {
        let reply = "Here are your cards:\n```json\n[\n  {\"front\": \"Mitosis\", \"back\": \"Cell division\"},\n  {\"front\": \"ATP\", \"back\": \"Energy carrier\"}\n]\n```\nGood luck!";

        let cards = parse_card_batch(reply).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1], NewCard::new("ATP", "Energy carrier"));
    }

    #[test]
    fn test_parse_card_batch_without_array() {
        assert!(matches!(
            parse_card_batch("sorry, I can't help with that"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_card_batch("] backwards ["),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_card_batch_malformed() {
        assert!(matches!(
            parse_card_batch("[{\"front\": \"only front\"}]"),
            Err(Error::Json(_))
        ));
    }
}
