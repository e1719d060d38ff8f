use crate::activity::ActivityLog;
use crate::activity::DailyGoal;
use crate::item::MasteryLevel;
use crate::item::VocabularyItem;
use crate::progress::UserProgress;
use crate::queue::build_queue;
use crate::settings::Settings;
use std::fmt;
use time::Date;
use time::OffsetDateTime;

const RECENTLY_LEARNED: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct RecentWord {
    pub front_text: String,
    pub back_text: String,
    pub learned_at: OffsetDateTime,
}

/// Overview of the collection and the user's progress at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub total_words: usize,
    pub learned_words: usize,
    /// Indexed by [`MasteryLevel::value`].
    pub mastery_counts: [usize; 5],
    pub due_reviews: usize,
    pub queue_size: usize,
    pub points: u32,
    pub level: u32,
    pub streak: u32,
    pub daily_goal: DailyGoal,
    pub week: Vec<(Date, u32)>,
    pub recently_learned: Vec<RecentWord>,
    pub reminder_due: bool,
}

impl Dashboard {
    pub fn new(
        items: &[VocabularyItem],
        progress: &UserProgress,
        activity: &ActivityLog,
        settings: &Settings,
        now: OffsetDateTime,
    ) -> Self {
        let mut mastery_counts = [0; 5];
        for item in items {
            mastery_counts[usize::from(item.mastery_level.value())] += 1;
        }

        let mut learned: Vec<_> = items
            .iter()
            .filter_map(|item| item.learned_at.map(|at| (at, item)))
            .collect();
        learned.sort_by(|(a, _), (b, _)| b.cmp(a));

        let recently_learned = learned
            .into_iter()
            .take(RECENTLY_LEARNED)
            .map(|(learned_at, item)| RecentWord {
                front_text: item.front_text.clone(),
                back_text: item.back_text.clone(),
                learned_at,
            })
            .collect();

        let today = now.date();

        Self {
            total_words: items.len(),
            learned_words: items.iter().filter(|item| !item.is_new()).count(),
            mastery_counts,
            due_reviews: items
                .iter()
                .filter(|item| !item.is_new() && item.is_due(now))
                .count(),
            queue_size: build_queue(items, &settings.session_config(), now).len(),
            points: progress.points,
            level: progress.level,
            streak: progress.streak,
            daily_goal: DailyGoal {
                studied: activity.studied_on(today),
                goal: settings.daily_goal(),
            },
            week: activity.last_seven_days(today),
            recently_learned,
            reminder_due: settings.reminders_enabled() && progress.reminder_due(now),
        }
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.reminder_due {
            writeln!(f, "It's been a while, time to practice!\n")?;
        }

        writeln!(
            f,
            "Level {} - {} points - {} day streak",
            self.level, self.points, self.streak
        )?;
        writeln!(f, "{} words in today's session", self.queue_size)?;
        writeln!(f, "{} reviews due", self.due_reviews)?;

        let goal = &self.daily_goal;
        write!(
            f,
            "Daily goal: {} / {} words ({:.0}%)",
            std::cmp::min(goal.studied, goal.goal),
            goal.goal,
            goal.percent()
        )?;
        if goal.is_reached() {
            writeln!(f, " - reached!")?;
        } else {
            writeln!(f, " - {} to go", goal.remaining())?;
        }

        writeln!(f, "\n{} / {} words learned", self.learned_words, self.total_words)?;
        for level in MasteryLevel::ALL {
            let count = self.mastery_counts[usize::from(level.value())];
            if count > 0 {
                writeln!(f, "  {:<10} {count}", level.name())?;
            }
        }

        writeln!(f, "\nLast 7 days")?;
        for (day, words) in &self.week {
            writeln!(f, "  {} {:>3} {}", day.weekday(), words, "#".repeat(*words as usize))?;
        }

        if !self.recently_learned.is_empty() {
            writeln!(f, "\nRecently learned")?;
            for word in &self.recently_learned {
                writeln!(f, "  {} - {}", word.front_text, word.back_text)?;
            }
        }

        Ok(())
    }
}
