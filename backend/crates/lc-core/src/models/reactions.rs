use crate::UserId;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Wire shape of one emoji's reactions on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub emoji: String,
    pub count: usize,
    pub users: Vec<UserId>,
}

/// Reactions on a message, keyed by emoji.
///
/// Only the set of reacting users is stored; the count is always derived from
/// it, so a count can never drift from the set it describes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Reaction>", from = "Vec<Reaction>")]
pub struct Reactions {
    by_emoji: BTreeMap<String, BTreeSet<UserId>>,
}

impl Reactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the user had already placed this reaction.
    pub fn add(&mut self, user_id: &UserId, emoji: &str) -> bool {
        self.by_emoji
            .entry(emoji.to_string())
            .or_default()
            .insert(user_id.clone())
    }

    /// Returns `false` if the user had not placed this reaction.
    pub fn remove(&mut self, user_id: &UserId, emoji: &str) -> bool {
        let Some(users) = self.by_emoji.get_mut(emoji) else {
            return false;
        };

        let removed = users.remove(user_id);
        if users.is_empty() {
            self.by_emoji.remove(emoji);
        }
        removed
    }

    pub fn count(&self, emoji: &str) -> usize {
        self.by_emoji.get(emoji).map_or(0, BTreeSet::len)
    }

    pub fn has_reacted(&self, user_id: &UserId, emoji: &str) -> bool {
        self.by_emoji
            .get(emoji)
            .is_some_and(|users| users.contains(user_id))
    }

    pub fn contains_emoji(&self, emoji: &str) -> bool {
        self.by_emoji.contains_key(emoji)
    }

    /// Number of distinct emoji on the message.
    pub fn distinct_emoji(&self) -> usize {
        self.by_emoji.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_emoji.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Reaction> + '_ {
        self.by_emoji.iter().map(|(emoji, users)| Reaction {
            emoji: emoji.clone(),
            count: users.len(),
            users: users.iter().cloned().collect(),
        })
    }
}

impl From<Reactions> for Vec<Reaction> {
    fn from(reactions: Reactions) -> Self {
        reactions.iter().collect()
    }
}

impl From<Vec<Reaction>> for Reactions {
    fn from(list: Vec<Reaction>) -> Self {
        let mut reactions = Reactions::new();
        for reaction in list {
            for user in &reaction.users {
                reactions.add(user, &reaction.emoji);
            }
        }
        reactions
    }
}
