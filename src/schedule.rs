use crate::error::Error;
use crate::item::MIN_EASE_FACTOR;
use crate::item::MasteryLevel;
use crate::item::VocabularyItem;
use serde::Deserialize;
use serde::Serialize;
use time::Duration;
use time::OffsetDateTime;

const FAILED_EASE_PENALTY: f64 = 0.2;
const SECOND_INTERVAL_DAYS: u32 = 6;
// Keeps due dates representable no matter how long a streak of easy answers gets.
const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Self-reported recall quality. The values are used directly as the `q` term of the SM-2 ease
/// update, so they aren't contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ReviewQuality {
    Again = 0,
    Hard = 3,
    Good = 4,
    Easy = 5,
}

impl ReviewQuality {
    pub const ALL: [ReviewQuality; 4] = [
        ReviewQuality::Again,
        ReviewQuality::Hard,
        ReviewQuality::Good,
        ReviewQuality::Easy,
    ];

    pub fn score(self) -> u8 {
        self as u8
    }

    /// Good or Easy.
    pub fn is_strong(self) -> bool {
        self >= ReviewQuality::Good
    }
}

impl From<ReviewQuality> for u8 {
    fn from(quality: ReviewQuality) -> Self {
        quality.score()
    }
}

impl TryFrom<u8> for ReviewQuality {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ReviewQuality::Again),
            3 => Ok(ReviewQuality::Hard),
            4 => Ok(ReviewQuality::Good),
            5 => Ok(ReviewQuality::Easy),
            _ => Err(Error::InvalidQuality(value)),
        }
    }
}

/// Returns the item as it should be stored after being graded `quality` at `now`.
pub fn apply_review(
    item: &VocabularyItem,
    quality: ReviewQuality,
    now: OffsetDateTime,
) -> VocabularyItem {
    let mut next = item.clone();

    let (ease_factor, interval_days) = match quality {
        ReviewQuality::Again => {
            next.repetition_count = 0;
            next.mastery_level = item.mastery_level.demoted();

            ((item.ease_factor - FAILED_EASE_PENALTY).max(MIN_EASE_FACTOR), 1)
        }
        ReviewQuality::Hard | ReviewQuality::Good | ReviewQuality::Easy => {
            let ease_factor = next_ease_factor(item.ease_factor, quality);
            next.repetition_count = item.repetition_count.saturating_add(1);

            let interval_days = match next.repetition_count {
                1 => 1,
                2 => SECOND_INTERVAL_DAYS,
                _ => scaled_interval(item.review_interval_days, ease_factor),
            };

            if quality.is_strong() {
                next.mastery_level = item.mastery_level.promoted();
            } else if item.is_new() {
                // A hard first answer still counts as the first exposure
                next.mastery_level = MasteryLevel::Learning;
            }

            if item.is_new() && !next.is_new() {
                next.learned_at = Some(now);
            }

            (ease_factor, interval_days)
        }
    };

    next.ease_factor = round_to_hundredths(ease_factor);
    next.review_interval_days = interval_days;
    next.next_review_due_at = now + Duration::days(interval_days.into());

    next
}

/// Points earned for grading an item that was at `level` before the review.
pub fn review_points(level: MasteryLevel, quality: ReviewQuality) -> u32 {
    let rank = u32::from(level.value()) + 1;

    match quality {
        ReviewQuality::Again => 0,
        ReviewQuality::Hard => std::cmp::max(10, rank * 5),
        ReviewQuality::Good | ReviewQuality::Easy => rank * 10,
    }
}

fn next_ease_factor(ease_factor: f64, quality: ReviewQuality) -> f64 {
    let distance = 5.0 - f64::from(quality.score());

    (ease_factor + (0.1 - distance * (0.08 + distance * 0.02))).max(MIN_EASE_FACTOR)
}

fn scaled_interval(previous_interval: u32, ease_factor: f64) -> u32 {
    let days = (f64::from(std::cmp::max(1, previous_interval)) * ease_factor).round();

    (days as u32).clamp(1, MAX_INTERVAL_DAYS)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
