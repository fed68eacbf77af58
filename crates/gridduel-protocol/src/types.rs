//! Message types that travel between the Grid Duel server and its clients.
//!
//! Everything in here is plain data with serde derives. The room engine
//! produces [`ServerMessage`]s, the connection handler wraps them in an
//! [`Envelope`] and a [`Codec`](crate::Codec) turns them into bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifies one connected participant.
///
/// The server derives it from the transport connection id, so it lives
/// exactly as long as the socket does. Serialized as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A room id chosen by the client when joining.
///
/// Rooms are created on the first join for an id and removed when the
/// last member leaves, so any string is a valid id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Game vocabulary
// ---------------------------------------------------------------------------

/// The playable characters. Each one maps to a fixed card catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterType {
    Knight,
    Archer,
    Rogue,
}

impl fmt::Display for CharacterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Knight => write!(f, "Knight"),
            Self::Archer => write!(f, "Archer"),
            Self::Rogue => write!(f, "Rogue"),
        }
    }
}

/// What a card does when it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Move,
    Block,
    Attack,
}

/// A grid coordinate, or a relative offset when used inside a card zone.
///
/// `x` grows to the right, `y` grows upward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// Intents a client can send.
///
/// Internally tagged, so a join looks like
/// `{"type":"JoinRoom","room_id":"lobby","name":"ann","character_type":"Knight"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Join (or create) the room with this id.
    JoinRoom {
        room_id: RoomId,
        name: String,
        character_type: CharacterType,
    },

    /// Commit three card keys from the current hand, in play order.
    SelectCards { cards: Vec<String> },

    /// Spend one reroll to discard the hand and draw a new one.
    RerollCards,

    /// Ask for the registry status (room ids and member names).
    ListRooms,
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// Per-player view inside a [`RoomSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub character_type: CharacterType,
    pub position: Cell,
    pub health: u32,
    pub max_health: u32,
    pub reroll: f32,
    pub energy: u32,
    pub block: u32,
    pub is_priority: bool,
}

/// The authoritative room state broadcast to both participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub round: u32,
    pub players: Vec<PlayerSnapshot>,
}

/// Who played the card in a [`CardAction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionActor {
    pub name: String,
    pub index: usize,
    pub has_energy: bool,
}

/// The card that was played in a [`CardAction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCard {
    pub key: String,
    pub name: String,
    pub kind: CardKind,
}

/// One resolved card. `hit_zone` is empty unless an attack went off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAction {
    pub player: ActionActor,
    pub card: ActionCard,
    pub hit_zone: Vec<Cell>,
}

/// A room and its members, for status listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStatus {
    pub room_id: RoomId,
    pub players: Vec<String>,
}

/// Everything the server pushes to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Private: a freshly drawn hand and the remaining reroll budget.
    Hand { cards: Vec<String>, reroll: f32 },

    /// Private: the card selection was accepted.
    CardsReceived,

    /// Private: waiting for the opponent (to join or to select).
    Wait,

    /// Clears a previous [`ServerMessage::Wait`].
    Unwait,

    /// Room-wide state snapshot.
    RoomData(RoomSnapshot),

    /// Room-wide: one card was resolved.
    CardAction(CardAction),

    /// Room-wide narration (match start, round, winner, departures).
    Announcement { message: String },

    /// Registry status, in reply to [`ClientMessage::ListRooms`].
    RoomList { rooms: Vec<RoomStatus> },

    /// Private: a request was rejected (join validation, bad frame).
    Error { message: String },
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Frame wrapper for every message on the wire.
///
/// `seq` is a per-connection counter kept by each side. `timestamp` is
/// milliseconds since the sender's connection started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<P> {
    pub seq: u64,
    #[serde(default)]
    pub timestamp: u64,
    pub payload: P,
}

impl<P> Envelope<P> {
    pub fn new(seq: u64, timestamp: u64, payload: P) -> Self {
        Self {
            seq,
            timestamp,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    //! The client parses these JSON shapes directly, so the serde
    //! attributes are pinned down here.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_room_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomId::new("lobby")).unwrap();
        assert_eq!(json, "\"lobby\"");
        assert_eq!(RoomId::new("lobby").to_string(), "lobby");
    }

    #[test]
    fn test_join_room_json_format() {
        let json = r#"{
            "type": "JoinRoom",
            "room_id": "arena",
            "name": "ann",
            "character_type": "Rogue"
        }"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinRoom {
                room_id: RoomId::new("arena"),
                name: "ann".into(),
                character_type: CharacterType::Rogue,
            }
        );
    }

    #[test]
    fn test_unknown_character_is_rejected() {
        let json = r#"{"type":"JoinRoom","room_id":"a","name":"b","character_type":"Wizard"}"#;
        let result: Result<ClientMessage, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_select_cards_json_format() {
        let msg = ClientMessage::SelectCards {
            cards: vec!["A".into(), "L1".into(), "B".into()],
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "SelectCards");
        assert_eq!(json["cards"], serde_json::json!(["A", "L1", "B"]));
    }

    #[test]
    fn test_unit_intents_are_bare_tags() {
        let json = serde_json::to_string(&ClientMessage::RerollCards).unwrap();
        assert_eq!(json, r#"{"type":"RerollCards"}"#);
        let json = serde_json::to_string(&ServerMessage::Wait).unwrap();
        assert_eq!(json, r#"{"type":"Wait"}"#);
    }

    #[test]
    fn test_room_data_flattens_snapshot_fields() {
        let msg = ServerMessage::RoomData(RoomSnapshot {
            room_id: RoomId::new("r"),
            round: 3,
            players: vec![PlayerSnapshot {
                name: "ann".into(),
                character_type: CharacterType::Knight,
                position: Cell::new(1, 1),
                health: 150,
                max_health: 150,
                reroll: 1.5,
                energy: 2,
                block: 0,
                is_priority: true,
            }],
        });
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "RoomData");
        assert_eq!(json["round"], 3);
        assert_eq!(json["players"][0]["position"]["x"], 1);
        assert_eq!(json["players"][0]["reroll"], 1.5);
        assert_eq!(json["players"][0]["is_priority"], true);
    }

    #[test]
    fn test_card_action_json_format() {
        let msg = ServerMessage::CardAction(CardAction {
            player: ActionActor {
                name: "ann".into(),
                index: 0,
                has_energy: true,
            },
            card: ActionCard {
                key: "A".into(),
                name: "Attack".into(),
                kind: CardKind::Attack,
            },
            hit_zone: vec![Cell::new(2, 1)],
        });
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "CardAction");
        assert_eq!(json["card"]["kind"], "Attack");
        assert_eq!(json["hit_zone"], serde_json::json!([{"x": 2, "y": 1}]));
    }

    #[test]
    fn test_envelope_timestamp_defaults_when_missing() {
        let json = r#"{"seq": 4, "payload": {"type": "RerollCards"}}"#;
        let env: Envelope<ClientMessage> = serde_json::from_str(json).unwrap();
        assert_eq!(env.seq, 4);
        assert_eq!(env.timestamp, 0);
        assert_eq!(env.payload, ClientMessage::RerollCards);
    }

    #[test]
    fn test_decode_unknown_intent_returns_error() {
        let unknown = r#"{"type": "FlyToMoon", "speed": 9000}"#;
        let result: Result<ClientMessage, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}
