//! Room lifecycle: `Generated` -> `Cleared`.
//!
//! Clearing is terminal for a room value. The next room is always a fresh
//! generation, never a mutation of the cleared one.

use serde::{Deserialize, Serialize};

use crate::room::Room;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomState {
    Generated,
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("cannot leave: {enemies_alive} enemies are still alive")]
    EnemiesAlive { enemies_alive: usize },
}

impl Room {
    pub fn state(&self) -> RoomState {
        if self.is_cleared {
            RoomState::Cleared
        } else {
            RoomState::Generated
        }
    }

    /// Enemies not yet reported dead by the client
    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| !e.is_dead).count()
    }
}

/// Mark a room cleared: exits open, roster emptied, boss flag dropped.
///
/// Does not check the roster. Callers on the leave-room path must run
/// [`ensure_leavable`] first.
pub fn clear_room(room: Room) -> Room {
    let mut layout = room.layout;
    layout.exits_open = true;
    Room {
        is_cleared: true,
        layout,
        enemies: Vec::new(),
        enemy_count: 0,
        enemies_alive: 0,
        has_boss: false,
        ..room
    }
}

/// Leave-room precondition: every enemy must be dead
pub fn ensure_leavable(room: &Room) -> Result<(), LifecycleError> {
    match room.living_enemies() {
        0 => Ok(()),
        enemies_alive => Err(LifecycleError::EnemiesAlive { enemies_alive }),
    }
}
