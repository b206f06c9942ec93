//! In-process room storage.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::RoomStorage;
use crate::state::GameState;

/// Keeps each room as a JSON document, the same shape an external store would
/// hold. Clones share the same rooms.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    rooms: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored document for `room_id`.
    #[must_use]
    pub fn document(&self, room_id: &str) -> Option<String> {
        self.rooms.borrow().get(room_id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.borrow().is_empty()
    }
}

impl RoomStorage for MemoryStorage {
    type Error = serde_json::Error;

    fn load_state(&self, room_id: &str) -> Result<Option<GameState>, Self::Error> {
        self.rooms
            .borrow()
            .get(room_id)
            .map(|doc| serde_json::from_str(doc))
            .transpose()
    }

    fn save_state(&self, room_id: &str, state: &GameState) -> Result<(), Self::Error> {
        let doc = serde_json::to_string(state)?;
        self.rooms.borrow_mut().insert(room_id.to_string(), doc);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Role;

    #[test]
    fn saves_replace_and_load_back() {
        let storage = MemoryStorage::new();
        assert!(storage.load_state("ABCD").unwrap().is_none());

        let mut state = GameState::with_roles(&[Role::Villager, Role::Beast, Role::Hunter]);
        storage.save_state("ABCD", &state).unwrap();
        state.current_round = 3;
        storage.save_state("ABCD", &state).unwrap();

        assert_eq!(storage.len(), 1);
        assert_eq!(storage.load_state("ABCD").unwrap(), Some(state));
    }

    #[test]
    fn documents_are_plain_json() {
        let storage = MemoryStorage::new();
        let state = GameState::with_roles(&[Role::Beast, Role::Villager]);
        storage.save_state("WXYZ", &state).unwrap();
        let doc: serde_json::Value =
            serde_json::from_str(&storage.document("WXYZ").unwrap()).unwrap();
        assert_eq!(doc["status"], "in_game");
        assert_eq!(doc["people"][0]["role"], "Beast");
        assert_eq!(doc["people"][0]["alive"], true);
        assert!(doc["votes"].is_object());
        assert!(doc["winner"].is_null());
    }
}
