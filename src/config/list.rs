//! Ordered notification list with identity protection.
//!
//! Index 0 is reserved for the identity notification, whose two triggers carry the local
//! user's profile name and display name. Every editing operation here is a no-op when it
//! would remove, add to, or reorder those protected slots; reorders are slice rotations, so
//! the list is only ever permuted, never rebuilt while someone iterates it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::models::{Notification, Trigger};

/// Position of the identity notification.
pub const IDENTITY_INDEX: usize = 0;
/// Number of triggers the identity notification always holds.
pub const IDENTITY_TRIGGER_COUNT: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct NotificationList {
    items: Vec<Notification>,
}

impl Default for NotificationList {
    fn default() -> Self {
        Self {
            items: vec![Notification::identity("", "")],
        }
    }
}

impl NotificationList {
    /// Build from an existing vector. The caller is responsible for the identity shape;
    /// see [`NotificationList::identity_is_valid`].
    pub fn from_vec(items: Vec<Notification>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Notification] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Notification> {
        self.items.get(index)
    }

    pub fn identity(&self) -> Option<&Notification> {
        self.items.get(IDENTITY_INDEX)
    }

    /// The list starts with an identity notification holding exactly two triggers.
    pub fn identity_is_valid(&self) -> bool {
        self.identity()
            .is_some_and(|n| n.triggers.len() == IDENTITY_TRIGGER_COUNT)
    }

    /// Update the identity trigger texts (compiled patterns follow lazily).
    pub fn set_identity_names(&mut self, profile_name: &str, display_name: &str) {
        if self.items.is_empty() {
            self.items
                .push(Notification::identity(profile_name, display_name));
            return;
        }
        let identity = &mut self.items[IDENTITY_INDEX];
        identity.triggers.resize_with(IDENTITY_TRIGGER_COUNT, || Trigger::normal(""));
        identity.triggers[0].text = profile_name.to_string();
        identity.triggers[1].text = display_name.to_string();
        debug!(
            target: "chatnotify::config",
            %profile_name, %display_name,
            "Identity notification updated"
        );
    }

    /// Append a notification; returns its index.
    pub fn push(&mut self, notification: Notification) -> usize {
        self.items.push(notification);
        self.items.len() - 1
    }

    /// Remove a notification. The identity notification cannot be removed.
    pub fn remove(&mut self, index: usize) -> Option<Notification> {
        if index == IDENTITY_INDEX || index >= self.items.len() {
            return None;
        }
        Some(self.items.remove(index))
    }

    /// Move the notification at `from` to position `to`. Neither may be the identity slot.
    /// Returns whether anything moved.
    pub fn move_notification(&mut self, from: usize, to: usize) -> bool {
        if from == IDENTITY_INDEX || to == IDENTITY_INDEX {
            return false;
        }
        rotate_move(&mut self.items, from, to)
    }

    /// Mark a notification as open in an editor (skipped during evaluation).
    pub fn set_editing(&mut self, index: usize, editing: bool) -> bool {
        match self.items.get_mut(index) {
            Some(n) => {
                n.editing = editing;
                true
            }
            None => false,
        }
    }

    /// Append a trigger to a notification; returns the trigger index.
    /// The identity notification's trigger list is fixed.
    pub fn add_trigger(&mut self, notification: usize, trigger: Trigger) -> Option<usize> {
        if notification == IDENTITY_INDEX {
            return None;
        }
        let n = self.items.get_mut(notification)?;
        n.triggers.push(trigger);
        Some(n.triggers.len() - 1)
    }

    /// Remove a trigger. Identity triggers cannot be removed.
    pub fn remove_trigger(&mut self, notification: usize, trigger: usize) -> Option<Trigger> {
        if notification == IDENTITY_INDEX {
            return None;
        }
        let n = self.items.get_mut(notification)?;
        if trigger >= n.triggers.len() {
            return None;
        }
        Some(n.triggers.remove(trigger))
    }

    /// Move a trigger within its notification. Identity triggers may only swap between
    /// slots 0 and 1.
    pub fn move_trigger(&mut self, notification: usize, from: usize, to: usize) -> bool {
        if notification == IDENTITY_INDEX
            && (from >= IDENTITY_TRIGGER_COUNT || to >= IDENTITY_TRIGGER_COUNT)
        {
            return false;
        }
        match self.items.get_mut(notification) {
            Some(n) => rotate_move(&mut n.triggers, from, to),
            None => false,
        }
    }
}

/// Move `items[from]` to `to` by rotating the range between them.
fn rotate_move<T>(items: &mut [T], from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
    true
}

impl<'a> IntoIterator for &'a NotificationList {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(text: &str) -> Notification {
        Notification::with_triggers(vec![Trigger::normal(text)])
    }

    fn first_texts(list: &NotificationList) -> Vec<String> {
        list.iter()
            .map(|n| n.triggers.first().map(|t| t.text.clone()).unwrap_or_default())
            .collect()
    }

    fn sample() -> NotificationList {
        let mut list = NotificationList::default();
        list.set_identity_names("Steve", "Stevie");
        list.push(named("a"));
        list.push(named("b"));
        list.push(named("c"));
        list
    }

    #[test]
    fn default_list_has_valid_identity() {
        let list = NotificationList::default();
        assert_eq!(list.len(), 1);
        assert!(list.identity_is_valid());
    }

    #[test]
    fn identity_cannot_be_removed_or_moved() {
        let mut list = sample();
        assert!(list.remove(0).is_none());
        assert!(!list.move_notification(0, 2));
        assert!(!list.move_notification(2, 0));
        assert_eq!(first_texts(&list), ["Steve", "a", "b", "c"]);
    }

    #[test]
    fn move_notification_rotates() {
        let mut list = sample();
        assert!(list.move_notification(1, 3));
        assert_eq!(first_texts(&list), ["Steve", "b", "c", "a"]);
        assert!(list.move_notification(3, 1));
        assert_eq!(first_texts(&list), ["Steve", "a", "b", "c"]);
        assert!(!list.move_notification(1, 9));
    }

    #[test]
    fn identity_triggers_are_fixed() {
        let mut list = sample();
        assert!(list.add_trigger(0, Trigger::normal("x")).is_none());
        assert!(list.remove_trigger(0, 0).is_none());
        assert!(list.remove_trigger(0, 1).is_none());
        assert!(!list.move_trigger(0, 1, 2));
        assert!(list.identity_is_valid());

        // Swapping within the reserved slots is allowed.
        assert!(list.move_trigger(0, 0, 1));
        let identity = list.identity().unwrap();
        assert_eq!(identity.triggers[0].text, "Stevie");
        assert_eq!(identity.triggers[1].text, "Steve");
        assert_eq!(identity.triggers.len(), 2);
    }

    #[test]
    fn only_guarded_edits_reach_the_identity() {
        let mut list = sample();
        assert!(list.set_editing(0, true));
        assert!(list.identity().unwrap().editing);
        assert!(list.remove_trigger(0, 1).is_none());
        assert!(list.move_trigger(0, 1, 0));
        assert!(list.identity_is_valid());
        assert_eq!(list.identity().unwrap().triggers.len(), IDENTITY_TRIGGER_COUNT);
    }

    #[test]
    fn regular_trigger_editing() {
        let mut list = sample();
        assert_eq!(list.add_trigger(1, Trigger::normal("a2")), Some(1));
        assert!(list.move_trigger(1, 1, 0));
        assert_eq!(list.get(1).unwrap().triggers[0].text, "a2");
        let removed = list.remove_trigger(1, 0).unwrap();
        assert_eq!(removed.text, "a2");
        assert!(list.remove_trigger(1, 5).is_none());
    }

    #[test]
    fn set_identity_names_repairs_shape() {
        let mut list = NotificationList::from_vec(vec![Notification::with_triggers(vec![])]);
        assert!(!list.identity_is_valid());
        list.set_identity_names("Alex", "Al");
        assert!(list.identity_is_valid());

        let mut empty = NotificationList::from_vec(Vec::new());
        empty.set_identity_names("Alex", "Al");
        assert!(empty.identity_is_valid());
    }

    #[test]
    fn serializes_as_plain_array() {
        let list = sample();
        let v = serde_json::to_value(&list).unwrap();
        assert_eq!(v.as_array().map(Vec::len), Some(4));
    }
}
