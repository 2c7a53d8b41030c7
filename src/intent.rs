// ============================================================================
// intent.rs — KeyIntent
// Read-only snapshots of the boolean intent vector.
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

// ======================== Intent Index ========================

/// Declared intent names in declaration order, with a name -> slot map.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct IntentIndex {
    names: Vec<String>,
    slots: HashMap<String, usize>,
}

impl IntentIndex {
    /// Returns the slot for `name`, declaring it if this is its first use.
    pub(crate) fn declare(&mut self, name: &str) -> usize {
        if let Some(&slot) = self.slots.get(name) {
            return slot;
        }
        let slot = self.names.len();
        self.names.push(name.to_owned());
        self.slots.insert(name.to_owned(), slot);
        slot
    }

    pub(crate) fn slot(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

// ======================== Intent State ========================

/// Immutable snapshot of which intents are active.
///
/// The key set is exactly the set of intents declared by the binding the
/// tracker was started with. Cloning copies the flags, so a snapshot can be
/// kept across frames without observing later changes.
#[derive(Clone)]
pub struct IntentState {
    index: Arc<IntentIndex>,
    active: Vec<bool>,
}

impl IntentState {
    /// Snapshot with every declared intent inactive.
    pub(crate) fn inactive(index: Arc<IntentIndex>) -> Self {
        let active = vec![false; index.len()];
        Self { index, active }
    }

    /// Snapshot with no declared intents, as reported by a stopped tracker.
    pub fn empty() -> Self {
        Self::inactive(Arc::default())
    }

    /// Writes one flag. Returns whether the value actually changed.
    pub(crate) fn set(&mut self, slot: usize, value: bool) -> bool {
        let flag = &mut self.active[slot];
        let changed = *flag != value;
        *flag = value;
        changed
    }

    pub(crate) fn name(&self, slot: usize) -> &str {
        &self.index.names[slot]
    }

    /// `Some(active)` for a declared intent, `None` otherwise.
    pub fn get(&self, intent: &str) -> Option<bool> {
        self.index.slot(intent).map(|slot| self.active[slot])
    }

    /// Whether `intent` is active. Undeclared intents are never active.
    pub fn is_active(&self, intent: &str) -> bool {
        self.get(intent).unwrap_or(false)
    }

    /// All declared intents with their flags, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.index
            .names
            .iter()
            .zip(&self.active)
            .map(|(name, &active)| (name.as_str(), active))
    }

    /// Names of the currently active intents.
    pub fn active(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().filter(|(_, active)| *active).map(|(name, _)| name)
    }

    pub fn any_active(&self) -> bool {
        self.active.iter().any(|&a| a)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl Index<&str> for IntentState {
    type Output = bool;

    /// Panics if `intent` is not declared, like indexing a map.
    fn index(&self, intent: &str) -> &bool {
        match self.index.slot(intent) {
            Some(slot) => &self.active[slot],
            None => panic!("intent {intent:?} is not declared by this binding"),
        }
    }
}

impl PartialEq for IntentState {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for IntentState {}

impl fmt::Debug for IntentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Serialize for IntentState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, active) in self.iter() {
            map.serialize_entry(name, &active)?;
        }
        map.end()
    }
}
