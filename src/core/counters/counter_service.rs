// Per-user command usage counters.
//
// Like the rest of core, nothing here knows about Discord. The Discord layer
// passes a raw user id and gets back the new count plus the sentence to show.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Which command a counter belongs to. Each kind lives in its own directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    HowManyTimes,
    HowManyButton,
}

impl CounterKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            CounterKind::HowManyTimes => "howmanytimes",
            CounterKind::HowManyButton => "howmanybutton",
        }
    }
}

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Counter file {path} does not contain a number: {content:?}")]
    Corrupt { path: PathBuf, content: String },

    #[error("Scratch file {0} could not be verified after writing")]
    Unverified(PathBuf),
}

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Adds one to the user's counter and returns the new value.
    /// A user without a counter starts from zero, so the first call returns 1.
    async fn increment(&self, kind: CounterKind, user_id: u64) -> Result<u64, CounterError>;

    /// Writes a throwaway file (used for oversized AI answers) and returns its path.
    async fn write_scratch_file(&self, file_name: &str, content: &str)
        -> Result<PathBuf, CounterError>;
}

pub struct CounterService<S: CounterStore> {
    store: S,
}

impl<S: CounterStore> CounterService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn increment(&self, kind: CounterKind, user_id: u64) -> Result<u64, CounterError> {
        let count = self.store.increment(kind, user_id).await?;
        tracing::debug!(user_id, counter = kind.dir_name(), count, "Counter incremented");
        Ok(count)
    }

    pub async fn write_scratch_file(
        &self,
        file_name: &str,
        content: &str,
    ) -> Result<PathBuf, CounterError> {
        self.store.write_scratch_file(file_name, content).await
    }
}

fn plural(count: u64) -> &'static str {
    if count == 1 {
        "time"
    } else {
        "times"
    }
}

pub fn usage_message(count: u64) -> String {
    format!("You have used this command {} {}.", count, plural(count))
}

pub fn button_message(user_id: u64, count: u64) -> String {
    format!("<@{}> clicked the button {} {}!", user_id, count, plural(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_message_singular_and_plural() {
        assert_eq!(usage_message(1), "You have used this command 1 time.");
        assert_eq!(usage_message(7), "You have used this command 7 times.");
    }

    #[test]
    fn test_button_message_mentions_user() {
        assert_eq!(button_message(42, 1), "<@42> clicked the button 1 time!");
        assert_eq!(button_message(42, 3), "<@42> clicked the button 3 times!");
    }

    #[test]
    fn test_counter_dirs_are_distinct() {
        assert_ne!(
            CounterKind::HowManyTimes.dir_name(),
            CounterKind::HowManyButton.dir_name()
        );
    }
}
