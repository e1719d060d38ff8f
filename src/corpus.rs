//! Loading the word list and reconciling it with previously saved scheduling state.

use crate::error::Result;
use crate::item::SavedState;
use crate::item::VocabularyItem;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use time::OffsetDateTime;
use tracing::debug;

/// An entry of the word list as it is shipped.
#[derive(Debug, Deserialize)]
struct CorpusEntry {
    #[serde(default)]
    word: String,
    #[serde(default)]
    translation: String,
    #[serde(default, alias = "sentence_es")]
    sentence_source: String,
    #[serde(default, alias = "sentence_sv")]
    sentence_target: String,
}

impl CorpusEntry {
    fn is_complete(&self) -> bool {
        !self.word.is_empty() && !self.translation.is_empty() && !self.sentence_source.is_empty()
    }
}

pub fn load_corpus(path: &Path, now: OffsetDateTime) -> Result<Vec<VocabularyItem>> {
    let file = File::open(path)?;

    parse_corpus(BufReader::new(file), now)
}

/// Parses a JSON array of word entries. Entries without a word, translation or example sentence
/// are skipped; the rest are numbered from 1 in order and start out new and due at `now`.
pub fn parse_corpus(reader: impl Read, now: OffsetDateTime) -> Result<Vec<VocabularyItem>> {
    let entries: Vec<CorpusEntry> = serde_json::from_reader(reader)?;
    let num_entries = entries.len();

    let items: Vec<_> = entries
        .into_iter()
        .filter(CorpusEntry::is_complete)
        .enumerate()
        .map(|(i, entry)| {
            VocabularyItem::new(
                (i + 1).to_string(),
                entry.word,
                entry.translation,
                entry.sentence_source,
                entry.sentence_target,
                now,
            )
        })
        .collect();

    debug!(
        loaded = items.len(),
        skipped = num_entries - items.len(),
        "parsed corpus"
    );

    Ok(items)
}

/// Overlays saved scheduling state onto the corpus, matching by id.
///
/// Every saved field that is present wins over the corpus default. Text always comes from the
/// corpus, and saved state for ids that are no longer in the corpus is dropped.
pub fn merge_saved_state(corpus: Vec<VocabularyItem>, saved: &[SavedState]) -> Vec<VocabularyItem> {
    let saved_by_id: HashMap<&str, &SavedState> =
        saved.iter().map(|state| (state.id.as_str(), state)).collect();

    corpus
        .into_iter()
        .map(|mut item| {
            if let Some(state) = saved_by_id.get(item.id.as_str()) {
                if let Some(level) = state.mastery_level {
                    item.mastery_level = level;
                }
                if let Some(due) = state.next_review_due_at {
                    item.next_review_due_at = due;
                }
                if let Some(learned_at) = state.learned_at {
                    item.learned_at = Some(learned_at);
                }
                if let Some(ease_factor) = state.ease_factor {
                    item.ease_factor = ease_factor;
                }
                if let Some(repetitions) = state.repetition_count {
                    item.repetition_count = repetitions;
                }
                if let Some(interval) = state.review_interval_days {
                    item.review_interval_days = interval;
                }
            }

            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::DEFAULT_EASE_FACTOR;
    use crate::item::MasteryLevel;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-05-10 08:30 UTC);

    const CORPUS: &str = r#"[
        {"word": "hola", "translation": "hej", "sentence_es": "Hola, amigo.", "sentence_sv": "Hej, kompis."},
        {"word": "", "translation": "tom", "sentence_es": "Nada."},
        {"word": "gracias", "translation": "tack", "sentence_es": "Muchas gracias.", "sentence_sv": "Tack så mycket."},
        {"word": "adiós", "translation": "hejdå"},
        {"word": "noche", "translation": "natt", "sentence_source": "Buenas noches."}
    ]"#;

    #[test]
    fn skips_incomplete_entries_and_numbers_the_rest() {
        let items = parse_corpus(CORPUS.as_bytes(), NOW).unwrap();

        let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(items[1].front_text, "gracias");
        assert_eq!(items[1].example_target, "Tack så mycket.");
        assert_eq!(items[2].example_source, "Buenas noches.");
        assert_eq!(items[2].example_target, "");
        assert!(items.iter().all(|item| item.is_new() && item.next_review_due_at == NOW));
    }

    #[test]
    fn rejects_malformed_corpus() {
        assert!(parse_corpus(r#"{"word": "hola"}"#.as_bytes(), NOW).is_err());
    }

    #[test]
    fn saved_fields_win_over_defaults() {
        let corpus = parse_corpus(CORPUS.as_bytes(), NOW).unwrap();
        let saved = vec![SavedState {
            id: "2".to_string(),
            mastery_level: Some(MasteryLevel::Confident),
            next_review_due_at: Some(datetime!(2024-06-01 00:00 UTC)),
            learned_at: Some(datetime!(2024-04-01 00:00 UTC)),
            ease_factor: Some(2.18),
            repetition_count: Some(4),
            review_interval_days: Some(22),
        }];

        let items = merge_saved_state(corpus, &saved);

        assert_eq!(items[1].front_text, "gracias");
        assert_eq!(items[1].mastery_level, MasteryLevel::Confident);
        assert_eq!(items[1].ease_factor, 2.18);
        assert_eq!(items[1].repetition_count, 4);
        assert_eq!(items[1].review_interval_days, 22);
        assert_eq!(items[1].learned_at, Some(datetime!(2024-04-01 00:00 UTC)));
        assert!(items[0].is_new());
        assert!(items[2].is_new());
    }

    #[test]
    fn missing_saved_fields_keep_defaults() {
        let corpus = parse_corpus(CORPUS.as_bytes(), NOW).unwrap();
        let saved = vec![SavedState {
            id: "1".to_string(),
            mastery_level: Some(MasteryLevel::Learning),
            ..SavedState::default()
        }];

        let items = merge_saved_state(corpus, &saved);

        assert_eq!(items[0].mastery_level, MasteryLevel::Learning);
        assert_eq!(items[0].ease_factor, DEFAULT_EASE_FACTOR);
        assert_eq!(items[0].repetition_count, 0);
        assert_eq!(items[0].next_review_due_at, NOW);
    }

    #[test]
    fn saved_state_for_removed_words_is_dropped() {
        let corpus = parse_corpus(CORPUS.as_bytes(), NOW).unwrap();
        let saved = vec![SavedState {
            id: "99".to_string(),
            mastery_level: Some(MasteryLevel::Mastered),
            ..SavedState::default()
        }];

        let items = merge_saved_state(corpus, &saved);

        assert_eq!(items.len(), 3);
        assert!(items.iter().all(VocabularyItem::is_new));
    }
}
