//! Error types for the room layer.

use gridduel_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
///
/// Join validation failures are shown to the offending client, so their
/// messages are written for players.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Both seats are taken or a match is running.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// Another player in the room already uses this name.
    #[error("name {0:?} is already taken")]
    NameTaken(String),

    #[error("name {name:?} is longer than {max} characters")]
    NameTooLong { name: String, max: usize },

    /// The player is already seated somewhere.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The player is not in this room.
    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    #[error("player {0} is not in any room")]
    NotInAnyRoom(PlayerId),

    /// The room's command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_errors_read_as_player_messages() {
        let err = RoomError::NameTaken("ann".into());
        assert_eq!(err.to_string(), "name \"ann\" is already taken");

        let err = RoomError::NameTooLong {
            name: "abcdefghijk".into(),
            max: 10,
        };
        assert_eq!(
            err.to_string(),
            "name \"abcdefghijk\" is longer than 10 characters"
        );

        let err = RoomError::RoomFull(RoomId::new("arena"));
        assert_eq!(err.to_string(), "room arena is full");
    }
}
