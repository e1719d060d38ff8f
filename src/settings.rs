use crate::error::Error;
use crate::error::Result;
use crate::queue::SessionConfig;

struct Bounds {
    name: &'static str,
    min: u32,
    max: u32,
    step: u32,
}

impl Bounds {
    fn check(&self, value: u32) -> Result<u32> {
        if value < self.min || value > self.max || (value - self.min) % self.step != 0 {
            return Err(Error::SettingOutOfRange {
                name: self.name,
                value,
                min: self.min,
                max: self.max,
                step: self.step,
            });
        }

        Ok(value)
    }
}

const DAILY_GOAL: Bounds = Bounds {
    name: "daily goal",
    min: 5,
    max: 50,
    step: 5,
};

const SESSION_SIZE: Bounds = Bounds {
    name: "session size",
    min: 5,
    max: 20,
    step: 1,
};

const NEW_WORDS_RATIO: Bounds = Bounds {
    name: "new words ratio",
    min: 0,
    max: 100,
    step: 5,
};

/// The user's study plan. Fields are only changed through the setters, which reject values
/// outside the allowed ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    daily_goal: u32,
    session_size: u32,
    new_words_ratio: u32,
    reminders_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_goal: 20,
            session_size: 10,
            new_words_ratio: 40,
            reminders_enabled: true,
        }
    }
}

impl Settings {
    pub fn new(
        daily_goal: u32,
        session_size: u32,
        new_words_ratio: u32,
        reminders_enabled: bool,
    ) -> Result<Self> {
        Ok(Self {
            daily_goal: DAILY_GOAL.check(daily_goal)?,
            session_size: SESSION_SIZE.check(session_size)?,
            new_words_ratio: NEW_WORDS_RATIO.check(new_words_ratio)?,
            reminders_enabled,
        })
    }

    /// Words per day.
    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    /// Items per session.
    pub fn session_size(&self) -> u32 {
        self.session_size
    }

    /// Percentage of a session reserved for new words.
    pub fn new_words_ratio(&self) -> u32 {
        self.new_words_ratio
    }

    pub fn reminders_enabled(&self) -> bool {
        self.reminders_enabled
    }

    pub fn set_daily_goal(&mut self, goal: u32) -> Result<()> {
        self.daily_goal = DAILY_GOAL.check(goal)?;
        Ok(())
    }

    pub fn set_session_size(&mut self, size: u32) -> Result<()> {
        self.session_size = SESSION_SIZE.check(size)?;
        Ok(())
    }

    pub fn set_new_words_ratio(&mut self, ratio: u32) -> Result<()> {
        self.new_words_ratio = NEW_WORDS_RATIO.check(ratio)?;
        Ok(())
    }

    pub fn set_reminders_enabled(&mut self, enabled: bool) {
        self.reminders_enabled = enabled;
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            session_size: self.session_size as usize,
            // Bounded to 100 by NEW_WORDS_RATIO
            new_words_ratio_percent: self.new_words_ratio as u8,
        }
    }
}
