//! Picks which items to present in a session and in what order.

use crate::item::VocabularyItem;
use time::OffsetDateTime;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub session_size: usize,
    /// Share of the session reserved for unseen items, 0..=100. Larger values are treated as 100.
    pub new_words_ratio_percent: u8,
}

impl SessionConfig {
    fn desired_new_count(&self) -> usize {
        let ratio = f64::from(std::cmp::min(self.new_words_ratio_percent, 100)) / 100.0;

        (ratio * self.session_size as f64).round() as usize
    }
}

/// Builds the ordered queue for one session.
///
/// Due reviews come first, earliest due first, and are never displaced by new items. New items
/// then take up to their share of the session in corpus order. Any slots still open are filled
/// with reviews that aren't due yet, then with the remaining new items. Each item appears at most
/// once.
pub fn build_queue<'a>(
    items: &'a [VocabularyItem],
    config: &SessionConfig,
    now: OffsetDateTime,
) -> Vec<&'a VocabularyItem> {
    let session_size = config.session_size;

    let (mut due_reviews, mut upcoming_reviews): (Vec<_>, Vec<_>) = items
        .iter()
        .filter(|item| !item.is_new())
        .partition(|item| item.is_due(now));
    let new_items: Vec<_> = items.iter().filter(|item| item.is_new()).collect();

    // Stable sorts, so equal due dates keep corpus order
    due_reviews.sort_by_key(|item| item.next_review_due_at);
    upcoming_reviews.sort_by_key(|item| item.next_review_due_at);

    let mut queue: Vec<&VocabularyItem> = due_reviews.iter().take(session_size).copied().collect();
    let num_due = queue.len();

    let remaining_slots = session_size - queue.len();
    let new_slots = std::cmp::min(config.desired_new_count(), remaining_slots);
    queue.extend(new_items.iter().take(new_slots));
    let num_new = queue.len() - num_due;

    let remaining_slots = session_size - queue.len();
    queue.extend(
        upcoming_reviews
            .iter()
            .chain(new_items.iter().skip(num_new))
            .take(remaining_slots),
    );

    queue.truncate(session_size);

    debug!(
        due = num_due,
        new = num_new,
        backfill = queue.len() - num_due - num_new,
        "built session queue"
    );

    queue
}
