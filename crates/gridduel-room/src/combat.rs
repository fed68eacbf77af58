//! Card resolution: movement, blocking and attack geometry.
//!
//! Everything here is synchronous and deterministic. The room actor
//! calls [`resolve`] once per card and only decides what to broadcast.

use gridduel_protocol::{CardKind, Cell};

use crate::RoomConfig;
use crate::catalog::Card;
use crate::player::Player;

/// Outcome of one resolved card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// `false` if the actor could not pay the cost. Nothing changed.
    pub has_energy: bool,
    /// On-grid cells covered by an attack. Empty for other cards.
    pub hit_zone: Vec<Cell>,
    pub hit: bool,
    /// Health actually lost by the opponent, after block.
    pub damage: u32,
}

impl Resolution {
    fn fizzled() -> Self {
        Self {
            has_energy: false,
            hit_zone: Vec::new(),
            hit: false,
            damage: 0,
        }
    }
}

/// Maps an attack zone onto the grid.
///
/// Offsets point toward the target: `dx` is mirrored when the target
/// stands to the left of `origin`. Off-grid cells are dropped.
pub fn hit_zone(origin: Cell, target: Cell, zone: &[Cell], config: &RoomConfig) -> Vec<Cell> {
    let direction = if target.x >= origin.x { 1 } else { -1 };
    zone.iter()
        .map(|offset| Cell::new(origin.x + offset.x * direction, origin.y + offset.y))
        .filter(|cell| config.contains(*cell))
        .collect()
}

/// Plays `card` for `actor` against `opponent`.
///
/// The cost is checked first. When energy is short the card is consumed
/// with no effect at all.
pub fn resolve(
    actor: &mut Player,
    opponent: &mut Player,
    card: &Card,
    config: &RoomConfig,
) -> Resolution {
    if actor.energy < card.cost {
        return Resolution::fizzled();
    }
    actor.energy -= card.cost;

    let mut outcome = Resolution {
        has_energy: true,
        hit_zone: Vec::new(),
        hit: false,
        damage: 0,
    };

    match card.kind {
        CardKind::Move => {
            let step = card.value as i32;
            for offset in card.zone {
                actor.position.x = (actor.position.x + offset.x * step).clamp(0, config.width - 1);
                actor.position.y = (actor.position.y + offset.y * step).clamp(0, config.height - 1);
            }
        }
        CardKind::Block => {
            actor.block = card.value;
        }
        CardKind::Attack => {
            outcome.hit_zone = hit_zone(actor.position, opponent.position, card.zone, config);
            if outcome.hit_zone.contains(&opponent.position) {
                outcome.hit = true;
                outcome.damage = card.value.saturating_sub(opponent.block);
                opponent.block = 0;
                opponent.take_damage(outcome.damage);
            }
        }
    }

    outcome
}
