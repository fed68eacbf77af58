//! Room configuration and the match state machine tag.

use std::time::Duration;

use gridduel_protocol::Cell;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pacing
// ---------------------------------------------------------------------------

/// Presentation pauses inserted between room events.
///
/// These are cooperative suspend points: the room keeps draining its
/// command channel while paused, so a disconnect is never delayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    /// After a resolved card is broadcast.
    pub after_action: Duration,
    /// After the snapshot that follows a resolved card.
    pub after_snapshot: Duration,
    /// After every narration message.
    pub after_announcement: Duration,
}

impl Pacing {
    /// No pauses at all. Used by tests that drive real sockets.
    pub const fn immediate() -> Self {
        Self {
            after_action: Duration::ZERO,
            after_snapshot: Duration::ZERO,
            after_announcement: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_action: Duration::from_millis(1000),
            after_snapshot: Duration::from_millis(2000),
            after_announcement: Duration::from_millis(3500),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Rules and tuning for one room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Grid width (x axis).
    pub width: i32,
    /// Grid height (y axis).
    pub height: i32,
    /// Starting cell for the first and second seat.
    pub start_cells: [Cell; 2],
    /// Cards drawn into a hand each Select phase.
    pub hand_size: usize,
    /// Cards a player must commit per round.
    pub selection_size: usize,
    /// Energy never regenerates past this value.
    pub max_energy: u32,
    /// Reroll budget never regenerates past this value.
    pub max_reroll: f32,
    pub energy_per_round: u32,
    pub reroll_per_round: f32,
    /// Longest accepted display name, in characters.
    pub max_name_len: usize,
    pub pacing: Pacing,
    /// Fixed RNG seed for hand draws and priority rolls. `None` seeds
    /// from the OS.
    pub seed: Option<u64>,
}

impl RoomConfig {
    /// Starting cell for the player sitting at `seat` (0 or 1).
    pub fn start_cell(&self, seat: usize) -> Cell {
        self.start_cells[seat.min(1)]
    }

    /// Returns `true` if `cell` lies on the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: 7,
            height: 3,
            start_cells: [Cell::new(1, 1), Cell::new(5, 1)],
            hand_size: 5,
            selection_size: 3,
            max_energy: 4,
            max_reroll: 2.0,
            energy_per_round: 1,
            reroll_per_round: 0.5,
            max_name_len: 10,
            pacing: Pacing::default(),
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// Where a room is in its match cycle.
///
/// ```text
/// Init ──(2nd join)──→ Select ──(both selected)──→ Execute
///                        ↑                            │
///                        ├────(both alive)────────────┤
///                        └──── End ←──(≤1 alive)──────┘
/// ```
///
/// A disconnect sends any state back to `Init`. `End` only lasts for
/// the winner narration before a rematch starts in `Select`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Init,
    Select,
    Execute,
    End,
}

impl RoomState {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Init)
    }

    /// Returns `true` while a match is running (any state but `Init`).
    pub fn is_active(&self) -> bool {
        !self.is_joinable()
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "Init"),
            Self::Select => write!(f, "Select"),
            Self::Execute => write!(f, "Execute"),
            Self::End => write!(f, "End"),
        }
    }
}
