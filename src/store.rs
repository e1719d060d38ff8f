//! SQLite persistence for scheduling state, progress, activity and settings. Word text isn't
//! stored; it always comes from the corpus.

use crate::activity::ActivityLog;
use crate::error::Error;
use crate::error::Result;
use crate::item::MasteryLevel;
use crate::item::SavedState;
use crate::item::VocabularyItem;
use crate::progress::AchievementSet;
use crate::progress::UserProgress;
use crate::settings::Settings;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::params;
use rusqlite::types::Type;
use std::path::Path;
use time::Date;
use time::OffsetDateTime;
use tracing::debug;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(db_path: &Path) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(db_path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(include_str!("schema.sql"))?;

        Ok(())
    }

    pub fn saved_states(&self) -> Result<Vec<SavedState>> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, masteryLevel, nextReviewNanos, learnedNanos, easeFactor,
                repetitionCount, reviewIntervalDays
            FROM ItemState
            ",
        )?;

        let iter = stmt.query_map([], |row| {
            let level: u8 = row.get(1)?;

            Ok(SavedState {
                id: row.get(0)?,
                mastery_level: Some(
                    MasteryLevel::try_from(level).map_err(|e| conversion_failure(1, e))?,
                ),
                next_review_due_at: Some(
                    from_nanos(row.get(2)?).map_err(|e| conversion_failure(2, e))?,
                ),
                learned_at: row
                    .get::<_, Option<i64>>(3)?
                    .map(from_nanos)
                    .transpose()
                    .map_err(|e| conversion_failure(3, e))?,
                ease_factor: row.get(4)?,
                repetition_count: row.get(5)?,
                review_interval_days: row.get(6)?,
            })
        })?;

        let r: std::result::Result<Vec<_>, rusqlite::Error> = iter.collect();

        Ok(r?)
    }

    pub fn progress(&self) -> Result<UserProgress> {
        let row: Option<(u32, u32, u32, Option<i64>)> = self
            .conn
            .query_row(
                "SELECT points, level, streak, lastSessionNanos FROM Progress WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        let Some((points, level, streak, last_session)) = row else {
            return Ok(UserProgress::default());
        };

        let mut stmt = self.conn.prepare("SELECT id FROM Achievement")?;
        let achievements: std::result::Result<AchievementSet, rusqlite::Error> =
            stmt.query_map([], |row| row.get::<_, String>(0))?.collect();

        Ok(UserProgress {
            points,
            level,
            streak,
            last_session_at: last_session.map(from_nanos).transpose()?,
            unlocked_achievements: achievements?,
        })
    }

    pub fn save_progress(&mut self, progress: &UserProgress) -> Result<()> {
        let tx = self.conn.transaction()?;

        write_progress(&tx, progress)?;

        tx.commit()?;

        Ok(())
    }

    pub fn activity(&self) -> Result<ActivityLog> {
        let mut stmt = self.conn.prepare("SELECT julianDay, words FROM Activity")?;

        let iter = stmt.query_map([], |row| {
            let julian_day: i32 = row.get(0)?;
            let day = Date::from_julian_day(julian_day).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(e))
            })?;

            Ok((day, row.get::<_, u32>(1)?))
        })?;

        let r: std::result::Result<ActivityLog, rusqlite::Error> = iter.collect();

        Ok(r?)
    }

    pub fn settings(&self) -> Result<Settings> {
        let row: Option<(u32, u32, u32, bool)> = self
            .conn
            .query_row(
                "
                SELECT dailyGoal, sessionSize, newWordsRatio, remindersEnabled
                FROM Settings
                WHERE id = 1
                ",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        match row {
            Some((daily_goal, session_size, new_words_ratio, reminders_enabled)) => {
                Settings::new(daily_goal, session_size, new_words_ratio, reminders_enabled)
            }
            None => Ok(Settings::default()),
        }
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.conn.execute(
            "
            INSERT INTO Settings(id, dailyGoal, sessionSize, newWordsRatio, remindersEnabled)
            VALUES (1, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                dailyGoal = excluded.dailyGoal,
                sessionSize = excluded.sessionSize,
                newWordsRatio = excluded.newWordsRatio,
                remindersEnabled = excluded.remindersEnabled
            ",
            params![
                settings.daily_goal(),
                settings.session_size(),
                settings.new_words_ratio(),
                settings.reminders_enabled()
            ],
        )?;

        Ok(())
    }

    /// Persists everything a finished session changed: the answered items, the new progress and
    /// the day's activity. Either all of it is written or none of it.
    pub fn save_session(
        &mut self,
        answered: &[&VocabularyItem],
        progress: &UserProgress,
        day: Date,
        words: u32,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;

        for item in answered {
            let next_review = nanos(item.next_review_due_at)?;
            let learned = item.learned_at.map(nanos).transpose()?;

            tx.execute(
                "
                INSERT INTO ItemState(id, masteryLevel, nextReviewNanos, learnedNanos,
                    easeFactor, repetitionCount, reviewIntervalDays)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    masteryLevel = excluded.masteryLevel,
                    nextReviewNanos = excluded.nextReviewNanos,
                    learnedNanos = excluded.learnedNanos,
                    easeFactor = excluded.easeFactor,
                    repetitionCount = excluded.repetitionCount,
                    reviewIntervalDays = excluded.reviewIntervalDays
                ",
                params![
                    item.id,
                    item.mastery_level.value(),
                    next_review,
                    learned,
                    item.ease_factor,
                    item.repetition_count,
                    item.review_interval_days
                ],
            )?;
        }

        if words > 0 {
            tx.execute(
                "
                INSERT INTO Activity(julianDay, words) VALUES (?, ?)
                ON CONFLICT(julianDay) DO UPDATE SET words = words + excluded.words
                ",
                params![day.to_julian_day(), words],
            )?;
        }

        write_progress(&tx, progress)?;

        tx.commit()?;

        debug!(items = answered.len(), words, "saved session");

        Ok(())
    }
}

fn write_progress(tx: &Transaction, progress: &UserProgress) -> Result<()> {
    let last_session = progress.last_session_at.map(nanos).transpose()?;

    tx.execute(
        "
        INSERT INTO Progress(id, points, level, streak, lastSessionNanos)
        VALUES (1, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            points = excluded.points,
            level = excluded.level,
            streak = excluded.streak,
            lastSessionNanos = excluded.lastSessionNanos
        ",
        params![
            progress.points,
            progress.level,
            progress.streak,
            last_session
        ],
    )?;

    // Achievements are never revoked, so the table only grows
    for id in progress.unlocked_achievements.ids() {
        tx.execute("INSERT OR IGNORE INTO Achievement(id) VALUES (?)", [id])?;
    }

    Ok(())
}

// Unix nanoseconds, which an i64 holds from 1677 to 2262
fn nanos(at: OffsetDateTime) -> Result<i64> {
    let ns = at.unix_timestamp_nanos();

    i64::try_from(ns).map_err(|_| Error::InvalidTimestamp(ns))
}

fn from_nanos(ns: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ns))
        .map_err(|_| Error::InvalidTimestamp(i128::from(ns)))
}

fn conversion_failure(column: usize, e: Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Integer, Box::new(e))
}
