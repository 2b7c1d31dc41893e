use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use crate::models::message::Message;

/// Shared handle to one thread's conversation history. Holding the lock for
/// the duration of a turn serializes concurrent requests on the same thread.
pub type Thread = Arc<AsyncMutex<Vec<Message>>>;

/// In-memory store of conversation histories keyed by thread id.
///
/// Threads live for the lifetime of the process; there is no eviction.
#[derive(Default)]
pub struct SessionStore {
    threads: Mutex<HashMap<String, Thread>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the history for a thread, creating an empty one on first use.
    pub fn thread(&self, thread_id: &str) -> Thread {
        let mut threads = self.threads.lock().unwrap();
        threads
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(Vec::new())))
            .clone()
    }

    /// Number of known threads, mainly for diagnostics.
    pub fn len(&self) -> usize {
        self.threads.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
