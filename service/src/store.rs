use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use minegrid_core::{
    Action, CellCount, Coord, GameSession, SessionSnapshot, SessionSummary,
};

use crate::*;

/// Parameters for a new game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGame {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

/// One cell intent; `flag: true` toggles a flag instead of revealing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAction {
    pub row: Coord,
    pub col: Coord,
    #[serde(default)]
    pub flag: bool,
}

impl From<CellAction> for Action {
    fn from(action: CellAction) -> Action {
        if action.flag {
            Action::Flag {
                row: action.row,
                col: action.col,
            }
        } else {
            Action::Reveal {
                row: action.row,
                col: action.col,
            }
        }
    }
}

/// In-memory registry of live sessions. Every session sits behind its own
/// lock, so actions on one game are serialized while independent games never
/// contend.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<GameSession>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, request: CreateGame) -> Result<SessionSnapshot> {
        let session = GameSession::create(request.width, request.height, request.mines)?;
        let snapshot = session.snapshot();
        log::info!(
            "created session {} ({}x{}, {} mines)",
            session.id(),
            request.width,
            request.height,
            request.mines
        );
        self.sessions
            .write()
            .expect("session registry lock poisoned")
            .insert(session.id(), Arc::new(Mutex::new(session)));
        Ok(snapshot)
    }

    pub fn apply(&self, id: Uuid, action: CellAction) -> Result<SessionSnapshot> {
        let session = self.lookup(id)?;
        let mut session = session.lock().expect("session lock poisoned");
        log::debug!("session {}: {:?}", id, action);
        Ok(session.apply(action.into())?)
    }

    pub fn get(&self, id: Uuid) -> Result<SessionSnapshot> {
        let session = self.lookup(id)?;
        let session = session.lock().expect("session lock poisoned");
        Ok(session.snapshot())
    }

    /// Board-less summaries of every session, newest started first with
    /// not-yet-started games at the end.
    pub fn list(&self) -> Vec<SessionSummary> {
        let sessions = self.sessions.read().expect("session registry lock poisoned");
        let mut summaries: Vec<_> = sessions
            .values()
            .map(|session| session.lock().expect("session lock poisoned").summary())
            .collect();
        summaries.sort_by(|a, b| b.date_started.cmp(&a.date_started));
        summaries
    }

    fn lookup(&self, id: Uuid) -> Result<Arc<Mutex<GameSession>>> {
        self.sessions
            .read()
            .expect("session registry lock poisoned")
            .get(&id)
            .cloned()
            .ok_or(ServiceError::SessionNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minegrid_core::{CellState, GameError, SessionState};

    fn reveal(row: Coord, col: Coord) -> CellAction {
        CellAction {
            row,
            col,
            flag: false,
        }
    }

    fn flag(row: Coord, col: Coord) -> CellAction {
        CellAction {
            row,
            col,
            flag: true,
        }
    }

    #[test]
    fn create_get_apply_round_trip() {
        let store = SessionStore::new();
        let created = store
            .create(CreateGame {
                width: 9,
                height: 9,
                mines: 10,
            })
            .unwrap();
        let id = created.summary.id;

        assert_eq!(store.get(id).unwrap(), created);

        let after_flag = store.apply(id, flag(0, 0)).unwrap();
        assert_eq!(after_flag.board[0][0].state, CellState::Flagged);

        let after_reveal = store.apply(id, reveal(4, 4)).unwrap();
        assert!(after_reveal.summary.progress > 0.0);
        assert_eq!(store.get(id).unwrap(), after_reveal);
    }

    #[test]
    fn invalid_configuration_creates_nothing() {
        let store = SessionStore::new();
        let result = store.create(CreateGame {
            width: 2,
            height: 2,
            mines: 4,
        });
        assert_eq!(
            result,
            Err(ServiceError::Game(GameError::InvalidConfiguration))
        );
        assert!(store.list().is_empty());
    }

    #[test]
    fn unknown_session_is_reported() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        assert_eq!(store.get(id), Err(ServiceError::SessionNotFound));
        assert_eq!(
            store.apply(id, reveal(0, 0)),
            Err(ServiceError::SessionNotFound)
        );
    }

    #[test]
    fn out_of_bounds_action_surfaces_the_game_error() {
        let store = SessionStore::new();
        let created = store
            .create(CreateGame {
                width: 9,
                height: 9,
                mines: 10,
            })
            .unwrap();
        assert_eq!(
            store.apply(created.summary.id, reveal(9, 9)),
            Err(ServiceError::Game(GameError::OutOfBounds))
        );
    }

    #[test]
    fn list_returns_summaries_newest_first() {
        let store = SessionStore::new();
        let request = CreateGame {
            width: 9,
            height: 9,
            mines: 10,
        };
        let first = store.create(request).unwrap().summary.id;
        let second = store.create(request).unwrap().summary.id;
        let third = store.create(request).unwrap().summary.id;

        // start two of the games; the untouched one sorts last
        store.apply(first, reveal(4, 4)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.apply(second, reveal(4, 4)).unwrap();

        let listed = store.list();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, second);
        assert_eq!(listed[1].id, first);
        assert_eq!(listed[2].id, third);
        assert_eq!(listed[2].state, SessionState::Started);
    }

    #[test]
    fn cell_action_deserializes_with_flag_defaulting_to_false() {
        let action: CellAction = serde_json::from_str(r#"{"row": 3, "col": 4}"#).unwrap();
        assert_eq!(action, reveal(3, 4));
        let action: CellAction =
            serde_json::from_str(r#"{"row": 3, "col": 4, "flag": true}"#).unwrap();
        assert_eq!(action, flag(3, 4));
    }
}
