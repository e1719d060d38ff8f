//! Vocabulary items and the scheduling state they carry.

use crate::error::Error;
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// How well an item has been learned. The numeric value is part of the persisted format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum MasteryLevel {
    New = 0,
    Learning = 1,
    Familiar = 2,
    Confident = 3,
    Mastered = 4,
}

impl MasteryLevel {
    pub const ALL: [MasteryLevel; 5] = [
        MasteryLevel::New,
        MasteryLevel::Learning,
        MasteryLevel::Familiar,
        MasteryLevel::Confident,
        MasteryLevel::Mastered,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    /// One bucket up, saturating at `Mastered`.
    pub fn promoted(self) -> Self {
        match self {
            MasteryLevel::New => MasteryLevel::Learning,
            MasteryLevel::Learning => MasteryLevel::Familiar,
            MasteryLevel::Familiar => MasteryLevel::Confident,
            MasteryLevel::Confident | MasteryLevel::Mastered => MasteryLevel::Mastered,
        }
    }

    /// One bucket down. An item that has left `New` never returns to it.
    pub fn demoted(self) -> Self {
        match self {
            MasteryLevel::New => MasteryLevel::New,
            MasteryLevel::Learning | MasteryLevel::Familiar => MasteryLevel::Learning,
            MasteryLevel::Confident => MasteryLevel::Familiar,
            MasteryLevel::Mastered => MasteryLevel::Confident,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MasteryLevel::New => "New",
            MasteryLevel::Learning => "Learning",
            MasteryLevel::Familiar => "Familiar",
            MasteryLevel::Confident => "Confident",
            MasteryLevel::Mastered => "Mastered",
        }
    }
}

impl From<MasteryLevel> for u8 {
    fn from(level: MasteryLevel) -> Self {
        level.value()
    }
}

impl TryFrom<u8> for MasteryLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        MasteryLevel::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(Error::InvalidMasteryLevel(value))
    }
}

/// A card in the corpus. The text fields never change after load; the remaining fields are
/// rewritten by [`crate::schedule::apply_review`].
///
/// Missing scheduling fields in serialized data fall back to their defaults (ease 2.5,
/// repetitions 0, interval 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub id: String,
    pub front_text: String,
    pub back_text: String,
    pub example_source: String,
    pub example_target: String,
    pub mastery_level: MasteryLevel,
    #[serde(with = "time::serde::rfc3339")]
    pub next_review_due_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub learned_at: Option<OffsetDateTime>,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    #[serde(default)]
    pub repetition_count: u32,
    #[serde(default)]
    pub review_interval_days: u32,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

impl VocabularyItem {
    /// Creates an unseen item that is due immediately.
    pub fn new(
        id: impl Into<String>,
        front_text: impl Into<String>,
        back_text: impl Into<String>,
        example_source: impl Into<String>,
        example_target: impl Into<String>,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            front_text: front_text.into(),
            back_text: back_text.into(),
            example_source: example_source.into(),
            example_target: example_target.into(),
            mastery_level: MasteryLevel::New,
            next_review_due_at: now,
            learned_at: None,
            ease_factor: DEFAULT_EASE_FACTOR,
            repetition_count: 0,
            review_interval_days: 0,
        }
    }

    pub fn is_new(&self) -> bool {
        self.mastery_level == MasteryLevel::New
    }

    pub fn is_due(&self, now: OffsetDateTime) -> bool {
        self.next_review_due_at <= now
    }
}

/// Scheduling fields as they were persisted. A field that is `None` wasn't stored and keeps
/// the corpus default when merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedState {
    pub id: String,
    pub mastery_level: Option<MasteryLevel>,
    pub next_review_due_at: Option<OffsetDateTime>,
    pub learned_at: Option<OffsetDateTime>,
    pub ease_factor: Option<f64>,
    pub repetition_count: Option<u32>,
    pub review_interval_days: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn promote_saturates_at_mastered() {
        assert_eq!(MasteryLevel::New.promoted(), MasteryLevel::Learning);
        assert_eq!(MasteryLevel::Confident.promoted(), MasteryLevel::Mastered);
        assert_eq!(MasteryLevel::Mastered.promoted(), MasteryLevel::Mastered);
    }

    #[test]
    fn demote_never_returns_to_new() {
        assert_eq!(MasteryLevel::New.demoted(), MasteryLevel::New);
        assert_eq!(MasteryLevel::Learning.demoted(), MasteryLevel::Learning);
        assert_eq!(MasteryLevel::Familiar.demoted(), MasteryLevel::Learning);
        assert_eq!(MasteryLevel::Mastered.demoted(), MasteryLevel::Confident);
    }

    #[test]
    fn mastery_level_from_u8() {
        assert_eq!(MasteryLevel::try_from(3).unwrap(), MasteryLevel::Confident);
        assert!(matches!(
            MasteryLevel::try_from(5),
            Err(Error::InvalidMasteryLevel(5))
        ));
    }

    #[test]
    fn missing_scheduling_fields_get_defaults() {
        let json = r#"{
            "id": "7",
            "frontText": "perro",
            "backText": "hund",
            "exampleSource": "El perro duerme.",
            "exampleTarget": "Hunden sover.",
            "masteryLevel": 0,
            "nextReviewDueAt": "2024-03-01T09:00:00Z"
        }"#;

        let item: VocabularyItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.ease_factor, DEFAULT_EASE_FACTOR);
        assert_eq!(item.repetition_count, 0);
        assert_eq!(item.review_interval_days, 0);
        assert_eq!(item.learned_at, None);
        assert_eq!(item.next_review_due_at, datetime!(2024-03-01 09:00 UTC));
    }

    #[test]
    fn unknown_mastery_level_is_rejected() {
        let json = r#"{
            "id": "7",
            "frontText": "perro",
            "backText": "hund",
            "exampleSource": "",
            "exampleTarget": "",
            "masteryLevel": 9,
            "nextReviewDueAt": "2024-03-01T09:00:00Z"
        }"#;

        assert!(serde_json::from_str::<VocabularyItem>(json).is_err());
    }

    #[test]
    fn new_item_is_due_immediately() {
        let now = datetime!(2024-03-01 09:00 UTC);
        let item = VocabularyItem::new("1", "gato", "katt", "", "", now);

        assert!(item.is_new());
        assert!(item.is_due(now));
    }
}
