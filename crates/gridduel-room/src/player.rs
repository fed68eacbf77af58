//! Per-participant runtime state.

use std::collections::VecDeque;

use gridduel_protocol::{Cell, CharacterType, PlayerId, PlayerSnapshot};

use crate::RoomConfig;
use crate::catalog::{CharacterTemplate, template};

/// One seated player.
///
/// Created on join, dropped on disconnect. Everything except identity
/// and position is reset by [`Player::reset_stats`] at the start of
/// every match.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub character: CharacterType,
    pub position: Cell,
    pub health: u32,
    pub energy: u32,
    pub block: u32,
    pub reroll: f32,
    /// Card keys drawn this Select phase.
    pub hand: Vec<&'static str>,
    /// Committed keys, drained front to back while the round resolves.
    pub chosen: VecDeque<&'static str>,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        character: CharacterType,
        position: Cell,
    ) -> Self {
        let mut player = Self {
            id,
            name: name.into(),
            character,
            position,
            health: 0,
            energy: 0,
            block: 0,
            reroll: 0.0,
            hand: Vec::new(),
            chosen: VecDeque::new(),
        };
        player.reset_stats();
        player
    }

    pub fn template(&self) -> &'static CharacterTemplate {
        template(self.character)
    }

    pub fn max_health(&self) -> u32 {
        self.template().max_health
    }

    /// Back to match-start stats. Position is left to the caller.
    pub fn reset_stats(&mut self) {
        self.health = self.max_health();
        self.reroll = 1.0;
        self.energy = 1;
        self.block = 0;
        self.hand.clear();
        self.chosen.clear();
    }

    /// Applies damage, flooring health at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Between-round regeneration. Both resources stop exactly at their cap.
    pub fn regenerate(&mut self, config: &RoomConfig) {
        self.energy = (self.energy + config.energy_per_round).min(config.max_energy);
        self.reroll = (self.reroll + config.reroll_per_round).min(config.max_reroll);
    }

    /// Returns `true` once a selection has been accepted this round.
    pub fn has_selected(&self) -> bool {
        !self.chosen.is_empty()
    }

    pub fn snapshot(&self, is_priority: bool) -> PlayerSnapshot {
        PlayerSnapshot {
            name: self.name.clone(),
            character_type: self.character,
            position: self.position,
            health: self.health,
            max_health: self.max_health(),
            reroll: self.reroll,
            energy: self.energy,
            block: self.block,
            is_priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knight() -> Player {
        Player::new(PlayerId(1), "ann", CharacterType::Knight, Cell::new(1, 1))
    }

    #[test]
    fn test_new_player_starts_with_reset_stats() {
        let p = knight();
        assert_eq!(p.health, 150);
        assert_eq!(p.energy, 1);
        assert_eq!(p.block, 0);
        assert_eq!(p.reroll, 1.0);
        assert!(p.hand.is_empty());
        assert!(!p.has_selected());
        assert_eq!(p.position, Cell::new(1, 1));
    }

    #[test]
    fn test_reset_stats_clears_match_state() {
        let mut p = knight();
        p.take_damage(40);
        p.energy = 4;
        p.block = 15;
        p.reroll = 0.0;
        p.hand = vec!["A", "B"];
        p.chosen = VecDeque::from(["A"]);

        p.reset_stats();
        assert_eq!(p.health, 150);
        assert_eq!(p.energy, 1);
        assert_eq!(p.block, 0);
        assert_eq!(p.reroll, 1.0);
        assert!(p.hand.is_empty());
        assert!(p.chosen.is_empty());
    }

    #[test]
    fn test_take_damage_floors_at_zero() {
        let mut p = knight();
        p.take_damage(100);
        assert_eq!(p.health, 50);
        assert!(p.is_alive());
        p.take_damage(90);
        assert_eq!(p.health, 0);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_regenerate_stops_at_caps() {
        let config = RoomConfig::default();
        let mut p = knight();

        p.regenerate(&config);
        assert_eq!(p.energy, 2);
        assert_eq!(p.reroll, 1.5);

        for _ in 0..10 {
            p.regenerate(&config);
        }
        assert_eq!(p.energy, config.max_energy);
        assert_eq!(p.reroll, config.max_reroll);
    }

    #[test]
    fn test_regenerate_clamps_partial_step() {
        let config = RoomConfig::default();
        let mut p = knight();
        p.reroll = 1.75;
        p.regenerate(&config);
        assert_eq!(p.reroll, 2.0);
    }

    #[test]
    fn test_snapshot_reports_template_max_health() {
        let mut p = Player::new(PlayerId(2), "bo", CharacterType::Archer, Cell::new(5, 1));
        p.take_damage(30);
        let snap = p.snapshot(true);
        assert_eq!(snap.name, "bo");
        assert_eq!(snap.health, 70);
        assert_eq!(snap.max_health, 100);
        assert!(snap.is_priority);
    }
}
