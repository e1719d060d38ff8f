//! Points, levels, streaks and achievements derived from completed sessions.

use crate::item::MasteryLevel;
use crate::item::VocabularyItem;
use crate::session::SessionResult;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;
use time::OffsetDateTime;
use tracing::debug;

pub const POINTS_PER_LEVEL: u32 = 1000;

const LEARNED_WORDS_GOAL: usize = 10;
const MASTERED_WORDS_GOAL: usize = 100;
const STREAK_GOAL: u32 = 7;
const REMINDER_AFTER_HOURS: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Achievement {
    TenWords,
    HundredWords,
    SevenDayStreak,
    PerfectSession,
}

impl Achievement {
    pub const ALL: [Achievement; 4] = [
        Achievement::TenWords,
        Achievement::HundredWords,
        Achievement::SevenDayStreak,
        Achievement::PerfectSession,
    ];

    /// Stable identifier, as persisted.
    pub fn id(self) -> &'static str {
        match self {
            Achievement::TenWords => "10_words",
            Achievement::HundredWords => "100_words",
            Achievement::SevenDayStreak => "7_day_streak",
            Achievement::PerfectSession => "perfect_session",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Achievement::ALL
            .into_iter()
            .find(|achievement| achievement.id() == id)
    }

    pub fn title(self) -> &'static str {
        match self {
            Achievement::TenWords => "Beginner",
            Achievement::HundredWords => "Wordsmith",
            Achievement::SevenDayStreak => "Persistent",
            Achievement::PerfectSession => "Perfectionist",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Achievement::TenWords => "Learn your first 10 words.",
            Achievement::HundredWords => "Master 100 words.",
            Achievement::SevenDayStreak => "Keep a streak for 7 days.",
            Achievement::PerfectSession => "Finish a session with every answer good or easy.",
        }
    }
}

/// Ids of unlocked achievements.
///
/// Membership is all that matters: the set serializes as a sorted sequence of ids, and
/// deserializing ignores order and duplicates. Ids that aren't in [`Achievement::ALL`] are kept
/// as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementSet(BTreeSet<String>);

impl AchievementSet {
    pub fn contains(&self, achievement: Achievement) -> bool {
        self.0.contains(achievement.id())
    }

    /// Returns true if the achievement wasn't unlocked before.
    pub fn unlock(&mut self, achievement: Achievement) -> bool {
        self.0.insert(achievement.id().to_string())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for AchievementSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub points: u32,
    pub level: u32,
    /// Consecutive calendar days with at least one completed session.
    pub streak: u32,
    /// `None` until the first session is completed.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_session_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub unlocked_achievements: AchievementSet,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
            streak: 0,
            last_session_at: None,
            unlocked_achievements: AchievementSet::default(),
        }
    }
}

impl UserProgress {
    pub fn hours_since_last_session(&self, now: OffsetDateTime) -> Option<f64> {
        self.last_session_at
            .map(|last| ((now - last).as_seconds_f64() / 3600.0).max(0.0))
    }

    /// True once a day has passed without practice. Never true before the first session.
    pub fn reminder_due(&self, now: OffsetDateTime) -> bool {
        self.hours_since_last_session(now)
            .is_some_and(|hours| hours >= REMINDER_AFTER_HOURS)
    }
}

pub fn level_for_points(points: u32) -> u32 {
    points / POINTS_PER_LEVEL + 1
}

/// Folds one completed session into the user's progress.
///
/// `points_earned` is the total awarded while the session's answers were scheduled, and `items`
/// is the whole collection after scheduling. The last session time is always moved to `now`. An
/// empty session leaves points and streak as they were; achievements derived from the collection
/// are still re-evaluated. Achievements are never revoked.
pub fn apply_session_results(
    progress: &UserProgress,
    results: &[SessionResult],
    points_earned: u32,
    items: &[VocabularyItem],
    now: OffsetDateTime,
) -> UserProgress {
    let mut next = progress.clone();

    if !results.is_empty() {
        next.points = progress.points.saturating_add(points_earned);
        next.level = level_for_points(next.points);
        next.streak = next_streak(progress, now);
    }
    next.last_session_at = Some(now);

    let learned = items.iter().filter(|item| !item.is_new()).count();
    let mastered = items
        .iter()
        .filter(|item| item.mastery_level == MasteryLevel::Mastered)
        .count();
    let perfect = !results.is_empty() && results.iter().all(|result| result.quality.is_strong());

    let achievements = &mut next.unlocked_achievements;
    if learned >= LEARNED_WORDS_GOAL {
        achievements.unlock(Achievement::TenWords);
    }
    if mastered >= MASTERED_WORDS_GOAL {
        achievements.unlock(Achievement::HundredWords);
    }
    if next.streak >= STREAK_GOAL {
        achievements.unlock(Achievement::SevenDayStreak);
    }
    if perfect {
        achievements.unlock(Achievement::PerfectSession);
    }

    debug!(
        points = next.points,
        level = next.level,
        streak = next.streak,
        achievements = next.unlocked_achievements.len(),
        "applied session results"
    );

    next
}

/// Drops the streak to zero when more than one calendar day has passed since the last session.
/// Meant to run once when the application starts, independently of completing a session.
pub fn decay_streak(progress: &UserProgress, now: OffsetDateTime) -> UserProgress {
    let mut next = progress.clone();

    if let Some(last) = progress.last_session_at {
        let days_since = (now.date() - last.to_offset(now.offset()).date()).whole_days();

        if days_since > 1 {
            next.streak = 0;
        }
    }

    next
}

fn next_streak(progress: &UserProgress, now: OffsetDateTime) -> u32 {
    let today = now.date();

    match progress
        .last_session_at
        .map(|last| last.to_offset(now.offset()).date())
    {
        Some(day) if day == today => progress.streak,
        Some(day) if today.previous_day() == Some(day) => progress.streak.saturating_add(1),
        _ => 1,
    }
}
