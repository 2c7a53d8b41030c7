// ============================================================================
// binding.rs — KeyIntent
// Physical key -> intent tables and their compiled lookup form.
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::intent::{IntentIndex, IntentState};

pub const MOVE_FORWARD: &str = "moveForward";
pub const MOVE_BACKWARD: &str = "moveBackward";
pub const MOVE_LEFT: &str = "moveLeft";
pub const MOVE_RIGHT: &str = "moveRight";
pub const SPRINT: &str = "sprint";
pub const TURN_LEFT: &str = "turnLeft";
pub const TURN_RIGHT: &str = "turnRight";

// ======================== Key Binding ========================

/// One row of a binding table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingEntry {
    /// Platform physical key code, e.g. `KeyW` or `ShiftLeft`. Opaque.
    pub key: String,
    pub intent: String,
}

/// Ordered table mapping physical key codes to intent names.
///
/// Building a table never fails; it is checked by [`KeyBinding::validate`]
/// and again when a tracker starts observing it. In JSON it is an array of
/// `{"key": .., "intent": ..}` objects so repeated keys are kept and
/// reported rather than collapsed by the parser.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBinding {
    entries: Vec<BindingEntry>,
}

impl KeyBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// WASD movement plus left shift for sprint.
    pub fn movement() -> Self {
        Self::new()
            .bind("KeyW", MOVE_FORWARD)
            .bind("KeyS", MOVE_BACKWARD)
            .bind("KeyA", MOVE_LEFT)
            .bind("KeyD", MOVE_RIGHT)
            .bind("ShiftLeft", SPRINT)
    }

    /// The movement table plus Q/E to turn in place.
    pub fn movement_with_turning() -> Self {
        Self::movement()
            .bind("KeyQ", TURN_LEFT)
            .bind("KeyE", TURN_RIGHT)
    }

    pub fn bind(mut self, key: impl Into<String>, intent: impl Into<String>) -> Self {
        self.entries.push(BindingEntry {
            key: key.into(),
            intent: intent.into(),
        });
        self
    }

    pub fn entries(&self) -> &[BindingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.compile().map(|_| ())
    }

    pub(crate) fn compile(&self) -> Result<BindingTable, ConfigurationError> {
        if self.entries.is_empty() {
            return Err(ConfigurationError::EmptyBinding);
        }

        let mut intents = IntentIndex::default();
        let mut by_key = HashMap::with_capacity(self.entries.len());

        for (index, entry) in self.entries.iter().enumerate() {
            if entry.key.trim().is_empty() {
                return Err(ConfigurationError::BlankEntry { index, field: "key" });
            }
            if entry.intent.trim().is_empty() {
                return Err(ConfigurationError::BlankEntry { index, field: "intent" });
            }
            let slot = intents.declare(&entry.intent);
            if by_key.insert(entry.key.clone(), slot).is_some() {
                return Err(ConfigurationError::DuplicateKey {
                    key: entry.key.clone(),
                });
            }
        }

        Ok(BindingTable {
            intents: Arc::new(intents),
            by_key,
        })
    }
}

impl<K, I> FromIterator<(K, I)> for KeyBinding
where
    K: Into<String>,
    I: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |binding, (key, intent)| binding.bind(key, intent))
    }
}

// ======================== Compiled Table ========================

/// Validated binding: key code -> intent slot, plus the shared intent index.
#[derive(Debug)]
pub(crate) struct BindingTable {
    intents: Arc<IntentIndex>,
    by_key: HashMap<String, usize>,
}

impl BindingTable {
    pub(crate) fn slot_for(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub(crate) fn key_count(&self) -> usize {
        self.by_key.len()
    }

    pub(crate) fn intent_count(&self) -> usize {
        self.intents.len()
    }

    pub(crate) fn initial_state(&self) -> IntentState {
        IntentState::inactive(Arc::clone(&self.intents))
    }
}
