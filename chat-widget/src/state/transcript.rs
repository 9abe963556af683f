//! Chat history model
//!
//! An append-only, insertion-ordered list of entries. The only entry that is
//! ever removed is the loader placeholder, and at most one exists at a time.

use crate::utils::constants::{ASSISTANT_AVATAR, ASSISTANT_NAME, USER_AVATAR, USER_NAME};

/// Who an entry belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// CSS class, also used as the avatar `alt`
    pub fn class_name(&self) -> &'static str {
        match self {
            Sender::User => USER_NAME,
            Sender::Assistant => ASSISTANT_NAME,
        }
    }

    pub fn avatar(&self) -> &'static str {
        match self {
            Sender::User => USER_AVATAR,
            Sender::Assistant => ASSISTANT_AVATAR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Message { sender: Sender, text: String },
    /// Reply pending for the given send cycle
    Loader { cycle: u64 },
    /// Shown in place of a reply when the send cycle failed
    Error { text: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatEntry {
    /// Stable render key, increasing in insertion order
    pub id: u64,
    pub kind: EntryKind,
}

impl ChatEntry {
    pub fn sender(&self) -> Sender {
        match &self.kind {
            EntryKind::Message { sender, .. } => *sender,
            EntryKind::Loader { .. } | EntryKind::Error { .. } => Sender::Assistant,
        }
    }

    pub fn is_loader(&self) -> bool {
        matches!(self.kind, EntryKind::Loader { .. })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn push_message(&mut self, sender: Sender, text: impl Into<String>) -> u64 {
        self.push(EntryKind::Message {
            sender,
            text: text.into(),
        })
    }

    pub fn push_error(&mut self, text: impl Into<String>) -> u64 {
        self.push(EntryKind::Error { text: text.into() })
    }

    /// Show the loader for `cycle`, replacing any loader still on screen
    pub fn show_loader(&mut self, cycle: u64) -> u64 {
        self.entries.retain(|e| !e.is_loader());
        self.push(EntryKind::Loader { cycle })
    }

    /// Remove the loader owned by `cycle`. Returns whether one was removed.
    pub fn remove_loader(&mut self, cycle: u64) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.kind != EntryKind::Loader { cycle });
        self.entries.len() != before
    }

    #[cfg(test)]
    pub fn loader_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_loader()).count()
    }

    /// Texts of all messages from `sender`, in order
    #[cfg(test)]
    pub fn messages_from(&self, sender: Sender) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match &e.kind {
                EntryKind::Message { sender: s, text } if *s == sender => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, kind: EntryKind) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(ChatEntry { id, kind });
        id
    }
}
