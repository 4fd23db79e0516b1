//! Error types for the generation core.
//!
//! Generation itself is total over its documented domain. These errors only
//! cover inputs that arrive from outside that domain.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("room size {size} is below the minimum of {min}")]
    RoomTooSmall { size: u32, min: u32 },
    #[error("unknown room type '{0}' (expected entrance, corridor, chamber or boss_room)")]
    UnknownRoomType(String),
}
