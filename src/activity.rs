use std::collections::BTreeMap;
use time::Date;

/// Number of words reviewed per calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLog {
    days: BTreeMap<Date, u32>,
}

impl ActivityLog {
    pub fn record(&mut self, day: Date, words: u32) {
        let count = self.days.entry(day).or_default();
        *count = count.saturating_add(words);
    }

    pub fn studied_on(&self, day: Date) -> u32 {
        self.days.get(&day).copied().unwrap_or(0)
    }

    /// The seven days ending with `today`, oldest first.
    pub fn last_seven_days(&self, today: Date) -> Vec<(Date, u32)> {
        (0..7)
            .rev()
            .filter_map(|days_ago| today.checked_sub(time::Duration::days(days_ago)))
            .map(|day| (day, self.studied_on(day)))
            .collect()
    }
}

impl FromIterator<(Date, u32)> for ActivityLog {
    fn from_iter<I: IntoIterator<Item = (Date, u32)>>(iter: I) -> Self {
        let mut log = ActivityLog::default();
        for (day, words) in iter {
            log.record(day, words);
        }
        log
    }
}

/// Progress towards the number of words the user wants to review each day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyGoal {
    pub studied: u32,
    pub goal: u32,
}

impl DailyGoal {
    pub fn percent(&self) -> f64 {
        if self.goal == 0 {
            return 0.0;
        }

        (f64::from(self.studied) / f64::from(self.goal) * 100.0).min(100.0)
    }

    pub fn remaining(&self) -> u32 {
        self.goal.saturating_sub(self.studied)
    }

    pub fn is_reached(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn sessions_on_the_same_day_add_up() {
        let mut log = ActivityLog::default();

        log.record(date!(2024-05-10), 10);
        log.record(date!(2024-05-10), 5);
        log.record(date!(2024-05-11), 3);

        assert_eq!(log.studied_on(date!(2024-05-10)), 15);
        assert_eq!(log.studied_on(date!(2024-05-11)), 3);
        assert_eq!(log.studied_on(date!(2024-05-12)), 0);
    }

    #[test]
    fn last_seven_days_oldest_first() {
        let log: ActivityLog = [
            (date!(2024-05-04), 8),
            (date!(2024-05-10), 2),
            (date!(2024-05-03), 99),
        ]
        .into_iter()
        .collect();

        let week = log.last_seven_days(date!(2024-05-10));

        assert_eq!(week.len(), 7);
        assert_eq!(week[0], (date!(2024-05-04), 8));
        assert_eq!(week[3], (date!(2024-05-07), 0));
        assert_eq!(week[6], (date!(2024-05-10), 2));
    }

    #[test]
    fn daily_goal_progress() {
        let halfway = DailyGoal { studied: 10, goal: 20 };
        let exceeded = DailyGoal { studied: 25, goal: 20 };
        let no_goal = DailyGoal { studied: 5, goal: 0 };

        assert_eq!(halfway.percent(), 50.0);
        assert_eq!(halfway.remaining(), 10);
        assert!(!halfway.is_reached());
        assert_eq!(exceeded.percent(), 100.0);
        assert_eq!(exceeded.remaining(), 0);
        assert!(exceeded.is_reached());
        assert_eq!(no_goal.percent(), 0.0);
    }
}
