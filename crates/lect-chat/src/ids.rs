//! Session id generation
//!
//! The id source is an injected collaborator so tests can supply
//! deterministic ids instead of the session reaching for global entropy.

/// Source of fresh session identifiers
pub trait SessionIdSource: Send + Sync {
    /// Mint a new unique session id
    fn next_id(&self) -> String;
}

/// Default id source backed by UUID v4
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdSource;

impl SessionIdSource for UuidIdSource {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::SessionIdSource;
    use parking_lot::Mutex;

    /// Id source that hands out a fixed sequence of ids
    pub struct FixedIdSource {
        ids: Mutex<Vec<String>>,
    }

    impl FixedIdSource {
        pub fn new(ids: &[&str]) -> Self {
            let ids: Vec<String> = ids.iter().rev().map(|s| s.to_string()).collect();
            Self {
                ids: Mutex::new(ids),
            }
        }
    }

    impl SessionIdSource for FixedIdSource {
        fn next_id(&self) -> String {
            self.ids.lock().pop().unwrap_or_else(|| "exhausted".into())
        }
    }
}
