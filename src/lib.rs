pub mod activity;
pub mod corpus;
pub mod error;
pub mod item;
pub mod progress;
pub mod queue;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod stats;
pub mod store;

pub use error::Error;
pub use error::Result;
pub use item::MasteryLevel;
pub use item::VocabularyItem;
pub use progress::Achievement;
pub use progress::UserProgress;
pub use progress::apply_session_results;
pub use queue::SessionConfig;
pub use queue::build_queue;
pub use schedule::ReviewQuality;
pub use schedule::apply_review;
pub use session::Session;
pub use session::SessionResult;
pub use settings::Settings;
pub use store::Store;
