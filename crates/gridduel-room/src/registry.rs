//! Room registry: creates rooms on demand and routes players to them.

use std::collections::HashMap;

use gridduel_protocol::{CharacterType, PlayerId, RoomId, RoomStatus};

use crate::room::spawn_room;
use crate::{Intent, PlayerSender, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks all live rooms and which player sits in which room.
///
/// A room is spawned by the first join for its id and shut down as
/// soon as its last player leaves. A player can be in at most one room.
pub struct RoomRegistry {
    config: RoomConfig,
    rooms: HashMap<RoomId, RoomHandle>,
    player_rooms: HashMap<PlayerId, RoomId>,
}

impl RoomRegistry {
    /// Creates an empty registry. Every room it spawns uses `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            config,
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
        }
    }

    /// Joins `room_id`, creating the room first if needed.
    ///
    /// A room created for a join that then fails is torn down again, so
    /// rejected joins never leave empty rooms behind.
    pub async fn join(
        &mut self,
        player_id: PlayerId,
        room_id: RoomId,
        name: impl Into<String>,
        character: CharacterType,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if let Some(current) = self.player_rooms.get(&player_id) {
            return Err(RoomError::AlreadyInRoom(player_id, current.clone()));
        }

        let (handle, created) = match self.rooms.get(&room_id) {
            Some(handle) => (handle.clone(), false),
            None => {
                let handle = spawn_room(room_id.clone(), self.config.clone(), DEFAULT_CHANNEL_SIZE);
                self.rooms.insert(room_id.clone(), handle.clone());
                tracing::info!(%room_id, "room created");
                (handle, true)
            }
        };

        match handle.join(player_id, name, character, sender).await {
            Ok(()) => {
                self.player_rooms.insert(player_id, room_id);
                Ok(())
            }
            Err(err) => {
                if created {
                    self.destroy_room(&room_id).await;
                }
                Err(err)
            }
        }
    }

    /// Removes a player from their room, destroying the room if it
    /// is left empty.
    pub async fn leave(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        let room_id = self
            .player_rooms
            .remove(&player_id)
            .ok_or(RoomError::NotInAnyRoom(player_id))?;
        let handle = self
            .rooms
            .get(&room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let remaining = handle.leave(player_id).await;
        if matches!(remaining, Ok(0) | Err(RoomError::Unavailable(_))) {
            self.destroy_room(&room_id).await;
        }
        remaining.map(|_| ())
    }

    /// Forwards an in-match intent to the player's room.
    pub async fn route(&self, player_id: PlayerId, intent: Intent) -> Result<(), RoomError> {
        let room_id = self
            .player_rooms
            .get(&player_id)
            .ok_or(RoomError::NotInAnyRoom(player_id))?;
        let handle = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        handle.send_intent(player_id, intent).await
    }

    /// Lists every room with its member names, sorted by room id.
    ///
    /// Rooms that fail to answer (shutting down) are skipped.
    pub async fn status(&self) -> Vec<RoomStatus> {
        let mut rooms = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(info) = handle.info().await {
                rooms.push(RoomStatus {
                    room_id: info.room_id,
                    players: info.players,
                });
            }
        }
        rooms.sort_by(|a, b| a.room_id.as_str().cmp(b.room_id.as_str()));
        rooms
    }

    pub async fn room_info(&self, room_id: &RoomId) -> Result<RoomInfo, RoomError> {
        let handle = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        handle.info().await
    }

    /// Returns the room a player is currently in, if any.
    pub fn player_room(&self, player_id: &PlayerId) -> Option<&RoomId> {
        self.player_rooms.get(player_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    async fn destroy_room(&mut self, room_id: &RoomId) {
        if let Some(handle) = self.rooms.remove(room_id) {
            let _ = handle.shutdown().await;
            self.player_rooms.retain(|_, rid| *rid != *room_id);
            tracing::info!(%room_id, "room destroyed");
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
