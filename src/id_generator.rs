//! Prefixed sequential ID generator for states and connections
//! Generates IDs like "state-1", "state-2", "connection-7".
//! Counters are per collection and only ever move forward.

use regex::Regex;
use std::sync::LazyLock;

pub const STATE_PREFIX: &str = "state";
pub const CONNECTION_PREFIX: &str = "connection";

static SUFFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d+)$").expect("valid id suffix regex (covered by tests)"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    /// Text before the dash, e.g. "state"
    prefix: String,
    /// Counter for next ID
    counter: u64,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 1,
        }
    }

    pub fn states() -> Self {
        Self::new(STATE_PREFIX)
    }

    pub fn connections() -> Self {
        Self::new(CONNECTION_PREFIX)
    }

    /// Generate the next ID
    pub fn next_id(&mut self) -> String {
        let id = self.peek();
        self.counter += 1;
        id
    }

    /// The ID the next call to `next_id` will return
    pub fn peek(&self) -> String {
        format!("{}-{}", self.prefix, self.counter)
    }

    /// Rebuild a generator from existing IDs: the counter becomes the
    /// largest numeric suffix plus one, or 1 if no ID carries a suffix.
    pub fn from_existing_ids<'a, I>(prefix: impl Into<String>, existing_ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let max_counter = existing_ids.into_iter().filter_map(Self::decode).max();

        let mut generator = Self::new(prefix);
        if let Some(max_counter) = max_counter {
            generator.counter = max_counter.saturating_add(1);
        }
        generator
    }

    /// Extract the integer after the last dash of an ID
    pub fn decode(id: &str) -> Option<u64> {
        SUFFIX_REGEX.captures(id)?.get(1)?.as_str().parse().ok()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::states()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_generation() {
        let mut gen = IdGenerator::states();
        assert_eq!(gen.next_id(), "state-1");
        assert_eq!(gen.next_id(), "state-2");
        assert_eq!(gen.peek(), "state-3");
        assert_eq!(gen.next_id(), "state-3");
    }

    #[test]
    fn test_decode() {
        assert_eq!(IdGenerator::decode("state-5"), Some(5));
        assert_eq!(IdGenerator::decode("connection-120"), Some(120));
        assert_eq!(IdGenerator::decode("my-state-9"), Some(9));
        assert_eq!(IdGenerator::decode("state-abc"), None);
        assert_eq!(IdGenerator::decode("state"), None);
        assert_eq!(IdGenerator::decode("state-"), None);
    }

    #[test]
    fn test_from_existing() {
        let existing = ["state-3", "state-12", "state-7"];
        let mut gen = IdGenerator::from_existing_ids(STATE_PREFIX, existing);
        assert_eq!(gen.next_id(), "state-13");
    }

    #[test]
    fn test_from_existing_empty_or_unparseable() {
        let gen = IdGenerator::from_existing_ids(CONNECTION_PREFIX, []);
        assert_eq!(gen.peek(), "connection-1");

        let gen = IdGenerator::from_existing_ids(CONNECTION_PREFIX, ["legacy", "edge-x"]);
        assert_eq!(gen.peek(), "connection-1");
    }
}
