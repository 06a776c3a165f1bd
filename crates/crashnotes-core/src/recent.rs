//! Bounded most-recent-first list of generated notes.
//!
//! Backed by a [`KeyValueStore`]. The list is stored as one JSON value under
//! [`RECENT_NOTES_KEY`] and rewritten wholesale on every change. Corrupt or
//! missing data reads as an empty list.

use std::sync::Arc;

use crate::model::{Content, RecentNote, Topic};
use crate::store::{KeyValueStore, LAST_TOPIC_KEY, RECENT_NOTES_KEY};

/// Maximum number of notes kept.
pub const MAX_RECENT_NOTES: usize = 5;

/// The recent-topics cache.
#[derive(Clone)]
pub struct RecentTopicsCache {
    store: Arc<dyn KeyValueStore>,
}

impl RecentTopicsCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current notes, most recent first.
    pub fn load(&self) -> Vec<RecentNote> {
        let Some(raw) = self.store.get(RECENT_NOTES_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<RecentNote>>(&raw) {
            Ok(mut notes) => {
                dedup_by_topic(&mut notes);
                notes.truncate(MAX_RECENT_NOTES);
                notes
            }
            Err(e) => {
                tracing::warn!("ignoring unreadable recent notes: {e}");
                Vec::new()
            }
        }
    }

    /// Move `topic` to the front with fresh `content` and return the new list.
    ///
    /// Any entry for the same normalized topic is replaced. The list is
    /// persisted before returning; a failed write is logged and the in-memory
    /// result is still returned.
    pub fn record(&self, topic: &Topic, content: &Content) -> Vec<RecentNote> {
        let key = topic.normalized();
        let mut notes = self.load();
        notes.retain(|note| note.topic.normalized() != key);
        notes.insert(0, RecentNote::new(topic.clone(), content.clone()));
        notes.truncate(MAX_RECENT_NOTES);

        match serde_json::to_string(&notes) {
            Ok(encoded) => {
                if let Err(e) = self.store.set(RECENT_NOTES_KEY, &encoded) {
                    tracing::warn!("failed to persist recent notes: {e:#}");
                }
            }
            Err(e) => tracing::warn!("failed to encode recent notes: {e}"),
        }

        notes
    }

    /// Content of a cached note. No network access; remembers the topic as
    /// the last one used.
    pub fn recall(&self, note: &RecentNote) -> Content {
        self.remember_topic(&note.topic);
        note.content.clone()
    }

    /// Find a cached note by topic, ignoring case.
    pub fn find(&self, topic: &Topic) -> Option<RecentNote> {
        self.load()
            .into_iter()
            .find(|note| note.topic.same_subject(topic))
    }

    /// Store `topic` in the last-used slot.
    pub fn remember_topic(&self, topic: &Topic) {
        if let Err(e) = self.store.set(LAST_TOPIC_KEY, topic.as_str()) {
            tracing::warn!("failed to persist last topic: {e:#}");
        }
    }

    /// The last submitted or recalled topic, if any.
    pub fn last_topic(&self) -> Option<Topic> {
        let raw = self.store.get(LAST_TOPIC_KEY)?;
        Topic::new(raw).ok()
    }

    /// Forget every cached note and the last topic.
    pub fn clear(&self) -> anyhow::Result<()> {
        self.store.remove(RECENT_NOTES_KEY)?;
        self.store.remove(LAST_TOPIC_KEY)
    }
}

fn dedup_by_topic(notes: &mut Vec<RecentNote>) {
    let mut seen = std::collections::HashSet::new();
    notes.retain(|note| seen.insert(note.topic.normalized()));
}
