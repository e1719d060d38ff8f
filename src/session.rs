//! One learning session: walks a queue, schedules each graded item and keeps the tally that is
//! handed to [`crate::progress::apply_session_results`] at the end.

use crate::item::VocabularyItem;
use crate::schedule::ReviewQuality;
use crate::schedule::apply_review;
use crate::schedule::review_points;
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub item_id: String,
    pub quality: ReviewQuality,
}

#[derive(Debug)]
pub struct Session {
    queue: Vec<String>,
    results: Vec<SessionResult>,
    points_earned: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub results: Vec<SessionResult>,
    pub points_earned: u32,
}

impl Session {
    pub fn new(queue: &[&VocabularyItem]) -> Self {
        Self {
            queue: queue.iter().map(|item| item.id.clone()).collect(),
            results: vec![],
            points_earned: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of items answered so far.
    pub fn answered(&self) -> usize {
        self.results.len()
    }

    /// Id of the item to present next, or `None` once every item has been answered.
    pub fn current(&self) -> Option<&str> {
        self.queue.get(self.results.len()).map(String::as_str)
    }

    pub fn is_finished(&self) -> bool {
        self.current().is_none()
    }

    /// Schedules the current item with the given grade and moves on to the next one.
    ///
    /// Panics if `item` isn't the current item.
    pub fn answer(&mut self, item: &mut VocabularyItem, quality: ReviewQuality, now: OffsetDateTime) {
        assert_eq!(
            self.current(),
            Some(item.id.as_str()),
            "answered an item that isn't the current one"
        );

        self.points_earned = self
            .points_earned
            .saturating_add(review_points(item.mastery_level, quality));
        *item = apply_review(item, quality, now);

        debug!(
            id = %item.id,
            quality = quality.score(),
            level = item.mastery_level.value(),
            interval = item.review_interval_days,
            "answered"
        );

        self.results.push(SessionResult {
            item_id: item.id.clone(),
            quality,
        });
    }

    pub fn finish(self) -> SessionSummary {
        SessionSummary {
            results: self.results,
            points_earned: self.points_earned,
        }
    }
}

impl SessionSummary {
    /// Answers graded Good or Easy.
    pub fn strong_answers(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.quality.is_strong())
            .count()
    }

    pub fn is_perfect(&self) -> bool {
        !self.results.is_empty() && self.strong_answers() == self.results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::MasteryLevel;
    use crate::progress::UserProgress;
    use crate::progress::apply_session_results;
    use crate::queue::SessionConfig;
    use crate::queue::build_queue;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-05-10 08:30 UTC);

    fn collection() -> Vec<VocabularyItem> {
        vec![
            VocabularyItem {
                mastery_level: MasteryLevel::Familiar,
                repetition_count: 2,
                review_interval_days: 6,
                ..VocabularyItem::new("1", "libro", "bok", "", "", datetime!(2024-05-01 08:00 UTC))
            },
            VocabularyItem::new("2", "agua", "vatten", "", "", NOW),
            VocabularyItem::new("3", "sol", "sol", "", "", NOW),
        ]
    }

    fn answer_current(session: &mut Session, items: &mut [VocabularyItem], quality: ReviewQuality) {
        let id = session.current().unwrap().to_string();
        let item = items.iter_mut().find(|item| item.id == id).unwrap();
        session.answer(item, quality, NOW);
    }

    #[test]
    fn walks_queue_in_order() {
        let mut items = collection();
        let config = SessionConfig {
            session_size: 3,
            new_words_ratio_percent: 40,
        };
        let queue = build_queue(&items, &config, NOW);
        let mut session = Session::new(&queue);

        assert_eq!(session.len(), 3);
        assert_eq!(session.current(), Some("1"));

        answer_current(&mut session, &mut items, ReviewQuality::Good);
        assert_eq!(session.current(), Some("2"));

        answer_current(&mut session, &mut items, ReviewQuality::Hard);
        answer_current(&mut session, &mut items, ReviewQuality::Again);

        assert!(session.is_finished());
        assert_eq!(session.answered(), 3);
    }

    #[test]
    fn accumulates_points_from_level_before_review() {
        let mut items = collection();
        let queue: Vec<_> = items.iter().collect();
        let mut session = Session::new(&queue);

        answer_current(&mut session, &mut items, ReviewQuality::Easy);
        answer_current(&mut session, &mut items, ReviewQuality::Hard);
        answer_current(&mut session, &mut items, ReviewQuality::Again);

        let summary = session.finish();

        // Familiar -> 30, Hard on New -> 10, Again -> 0
        assert_eq!(summary.points_earned, 40);
        assert_eq!(summary.strong_answers(), 1);
        assert!(!summary.is_perfect());
        assert_eq!(items[0].mastery_level, MasteryLevel::Confident);
        assert_eq!(items[1].mastery_level, MasteryLevel::Learning);
        assert_eq!(items[2].mastery_level, MasteryLevel::New);
    }

    #[test]
    fn summary_feeds_progress() {
        let mut items = collection();
        let queue: Vec<_> = items.iter().take(2).collect();
        let mut session = Session::new(&queue);

        answer_current(&mut session, &mut items, ReviewQuality::Good);
        answer_current(&mut session, &mut items, ReviewQuality::Easy);
        let summary = session.finish();

        let progress = apply_session_results(
            &UserProgress::default(),
            &summary.results,
            summary.points_earned,
            &items,
            NOW,
        );

        assert!(summary.is_perfect());
        assert_eq!(progress.points, 40);
        assert_eq!(progress.streak, 1);
    }

    #[test]
    fn empty_session_is_finished() {
        let session = Session::new(&[]);

        assert!(session.is_empty());
        assert!(session.is_finished());
        assert!(!session.finish().is_perfect());
    }

    #[test]
    #[should_panic]
    fn answering_wrong_item_panics() {
        let mut items = collection();
        let queue: Vec<_> = items.iter().take(1).collect();
        let mut session = Session::new(&queue);

        session.answer(&mut items[2], ReviewQuality::Good, NOW);
    }

    #[test]
    fn results_round_trip_through_json() {
        let result = SessionResult {
            item_id: "12".to_string(),
            quality: ReviewQuality::Hard,
        };

        let json = serde_json::to_string(&result).unwrap();

        assert_eq!(json, r#"{"itemId":"12","quality":3}"#);
        assert_eq!(serde_json::from_str::<SessionResult>(&json).unwrap(), result);
        assert!(serde_json::from_str::<SessionResult>(r#"{"itemId":"1","quality":1}"#).is_err());
    }
}
