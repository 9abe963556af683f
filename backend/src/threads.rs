//! # Conversation Threads
//!
//! In-memory thread registry. A thread is the ordered list of turns exchanged
//! under one id; the widget keeps the id in session storage and sends it back
//! as `threadId`.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Most threads kept in memory; the least recently used one is dropped first
pub const MAX_THREADS: usize = 10_000;

/// Turns kept per thread; older turns fall out of the history
pub const MAX_TURNS_PER_THREAD: usize = 200;

/// Longest client-supplied thread id that is adopted
pub const MAX_THREAD_ID_LEN: usize = 64;

#[derive(Default)]
struct Thread {
    turns: Vec<Turn>,
    last_used: u64,
}

#[derive(Default)]
struct Threads {
    by_id: HashMap<String, Thread>,
    clock: u64,
}

impl Threads {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .by_id
            .iter()
            .min_by_key(|(_, thread)| thread.last_used)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            tracing::debug!(thread_id = %id, "Evicting thread");
            self.by_id.remove(&id);
        }
    }
}

pub struct ThreadRegistry {
    capacity: usize,
    threads: RwLock<Threads>,
}

impl Default for ThreadRegistry {
    fn default() -> Self {
        Self::with_capacity(MAX_THREADS)
    }
}

impl ThreadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            threads: RwLock::new(Threads::default()),
        }
    }

    /// Return the id to use for this request.
    ///
    /// A missing, blank or malformed id gets a fresh UUID v4. A well-formed
    /// id (up to [`MAX_THREAD_ID_LEN`] of `[A-Za-z0-9_-]`) is kept as is; if
    /// the registry has never seen it (e.g. after a restart) it starts with
    /// an empty history.
    pub async fn resolve(&self, requested: Option<&str>) -> String {
        let id = match requested.map(str::trim).filter(|id| is_valid_thread_id(id)) {
            Some(id) => id.to_string(),
            None => {
                if requested.is_some_and(|id| !id.trim().is_empty()) {
                    tracing::warn!("Ignoring malformed thread id");
                }
                Uuid::new_v4().to_string()
            }
        };

        let mut threads = self.threads.write().await;
        let now = threads.tick();
        if let Some(thread) = threads.by_id.get_mut(&id) {
            thread.last_used = now;
            return id;
        }

        if threads.by_id.len() >= self.capacity {
            threads.evict_least_recent();
        }
        tracing::debug!(thread_id = %id, "Starting thread");
        threads.by_id.insert(
            id.clone(),
            Thread {
                turns: Vec::new(),
                last_used: now,
            },
        );
        id
    }

    /// The last `limit` turns of a thread, oldest first.
    pub async fn recent(&self, id: &str, limit: usize) -> Vec<Turn> {
        let threads = self.threads.read().await;
        threads
            .by_id
            .get(id)
            .map(|thread| {
                let skip = thread.turns.len().saturating_sub(limit);
                thread.turns[skip..].to_vec()
            })
            .unwrap_or_default()
    }

    pub async fn append(&self, id: &str, turns: impl IntoIterator<Item = Turn>) {
        let mut threads = self.threads.write().await;
        let now = threads.tick();
        if !threads.by_id.contains_key(id) && threads.by_id.len() >= self.capacity {
            threads.evict_least_recent();
        }

        let thread = threads.by_id.entry(id.to_string()).or_default();
        thread.last_used = now;
        thread.turns.extend(turns);

        let excess = thread.turns.len().saturating_sub(MAX_TURNS_PER_THREAD);
        if excess > 0 {
            thread.turns.drain(..excess);
        }
    }

    pub async fn len(&self, id: &str) -> usize {
        self.threads
            .read()
            .await
            .by_id
            .get(id)
            .map_or(0, |thread| thread.turns.len())
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.threads.read().await.by_id.contains_key(id)
    }

    #[cfg(test)]
    pub async fn thread_count(&self) -> usize {
        self.threads.read().await.by_id.len()
    }
}

fn is_valid_thread_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_THREAD_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
