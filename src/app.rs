use crate::clock::Clock;
use crate::prompt;
use anyhow::Context;
use anyhow::Result;
use tracing::debug;
use tracing::info;
use vocab_srs::Achievement;
use vocab_srs::Session;
use vocab_srs::Settings;
use vocab_srs::Store;
use vocab_srs::UserProgress;
use vocab_srs::VocabularyItem;
use vocab_srs::apply_session_results;
use vocab_srs::build_queue;
use vocab_srs::corpus::merge_saved_state;
use vocab_srs::progress::decay_streak;
use vocab_srs::session::SessionSummary;
use vocab_srs::stats::Dashboard;

/// Changes requested through the `settings` command. `None` leaves a value as it is.
#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub daily_goal: Option<u32>,
    pub session_size: Option<u32>,
    pub new_words_ratio: Option<u32>,
    pub reminders_enabled: Option<bool>,
}

pub struct App<C: Clock> {
    store: Store,
    clock: C,
}

impl<C: Clock> App<C> {
    pub fn new(store: Store, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn init(&mut self, corpus: &[VocabularyItem]) -> Result<()> {
        self.store.init()?;

        println!("Initialized with {} words", corpus.len());
        Ok(())
    }

    /// Runs on every start other than `init`, so a missed day breaks the streak even without
    /// completing another session.
    pub fn activate(&mut self) -> Result<()> {
        let progress = self.store.progress()?;
        let decayed = decay_streak(&progress, self.clock.now());

        if decayed != progress {
            info!(streak = progress.streak, "streak lost");
            self.store.save_progress(&decayed)?;
        }

        Ok(())
    }

    pub fn review(&mut self, corpus: Vec<VocabularyItem>) -> Result<()> {
        let mut items = self.items(corpus)?;
        let settings = self.store.settings()?;

        let mut session = Session::new(&build_queue(
            &items,
            &settings.session_config(),
            self.clock.now(),
        ));

        if session.is_empty() {
            println!("Nothing to review");
            return Ok(());
        }

        println!("{} words to review\n", session.len());

        while let Some(id) = session.current() {
            let item = items
                .iter_mut()
                .find(|item| item.id == id)
                .with_context(|| format!("Word {id} is missing from the collection"))?;

            show_front(item)?;
            let quality = prompt::grade()?;

            session.answer(item, quality, self.clock.now());
            println!();
        }

        let summary = session.finish();
        let progress = self.complete_session(&items, &summary)?;

        println!(
            "Answered {}/{} well, earned {} points",
            summary.strong_answers(),
            summary.results.len(),
            summary.points_earned
        );
        println!(
            "Level {} - {} points - {} day streak",
            progress.level, progress.points, progress.streak
        );

        Ok(())
    }

    /// Folds a finished session into the stored progress and persists the answered items and
    /// the day's activity in one transaction.
    fn complete_session(
        &mut self,
        items: &[VocabularyItem],
        summary: &SessionSummary,
    ) -> Result<UserProgress> {
        let now = self.clock.now();
        let before = self.store.progress()?;

        let progress = apply_session_results(
            &before,
            &summary.results,
            summary.points_earned,
            items,
            now,
        );

        let answered: Vec<_> = items
            .iter()
            .filter(|item| {
                summary
                    .results
                    .iter()
                    .any(|result| result.item_id == item.id)
            })
            .collect();

        self.store.save_session(
            &answered,
            &progress,
            now.date(),
            summary.results.len() as u32,
        )?;

        for achievement in Achievement::ALL {
            if progress.unlocked_achievements.contains(achievement)
                && !before.unlocked_achievements.contains(achievement)
            {
                println!("Achievement unlocked: {}!", achievement.title());
            }
        }

        Ok(progress)
    }

    pub fn stats(&self, corpus: Vec<VocabularyItem>) -> Result<()> {
        print!("{}", self.dashboard(corpus)?);

        Ok(())
    }

    fn dashboard(&self, corpus: Vec<VocabularyItem>) -> Result<Dashboard> {
        let items = self.items(corpus)?;

        Ok(Dashboard::new(
            &items,
            &self.store.progress()?,
            &self.store.activity()?,
            &self.store.settings()?,
            self.clock.now(),
        ))
    }

    pub fn achievements(&self) -> Result<()> {
        let unlocked = self.store.progress()?.unlocked_achievements;

        for achievement in Achievement::ALL {
            let mark = if unlocked.contains(achievement) {
                "x"
            } else {
                " "
            };

            println!(
                "[{mark}] {} - {}",
                achievement.title(),
                achievement.description()
            );
        }

        Ok(())
    }

    pub fn settings(&mut self, update: SettingsUpdate) -> Result<()> {
        let settings = self.update_settings(update)?;

        println!("Daily goal: {} words", settings.daily_goal());
        println!("Session size: {} words", settings.session_size());
        println!("New words: {}%", settings.new_words_ratio());
        println!(
            "Reminders: {}",
            if settings.reminders_enabled() {
                "on"
            } else {
                "off"
            }
        );

        Ok(())
    }

    fn update_settings(&mut self, update: SettingsUpdate) -> Result<Settings> {
        let mut settings = self.store.settings()?;
        let before = settings;

        if let Some(goal) = update.daily_goal {
            settings.set_daily_goal(goal)?;
        }
        if let Some(size) = update.session_size {
            settings.set_session_size(size)?;
        }
        if let Some(ratio) = update.new_words_ratio {
            settings.set_new_words_ratio(ratio)?;
        }
        if let Some(enabled) = update.reminders_enabled {
            settings.set_reminders_enabled(enabled);
        }

        if settings != before {
            debug!(?settings, "saving settings");
            self.store.save_settings(&settings)?;
        }

        Ok(settings)
    }

    fn items(&self, corpus: Vec<VocabularyItem>) -> Result<Vec<VocabularyItem>> {
        Ok(merge_saved_state(corpus, &self.store.saved_states()?))
    }
}

fn show_front(item: &VocabularyItem) -> Result<()> {
    println!("{}\n", item.front_text);
    if !item.example_source.is_empty() {
        println!("{}\n", item.example_source);
    }

    prompt::reveal()?;

    println!("{}", "-".repeat(79));

    println!("{}\n", item.back_text);
    if !item.example_target.is_empty() {
        println!("{}\n", item.example_target);
    }

    Ok(())
}
