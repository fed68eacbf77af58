//! Character templates and their card catalogs.
//!
//! Catalogs are static tables. A player references its cards by key and
//! looks them up through [`template`]; nothing here is ever mutated.

use gridduel_protocol::{CardKind, Cell, CharacterType};

/// One card definition.
///
/// Keys are not unique within a catalog: two entries with the same key
/// are two copies of the same card in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub key: &'static str,
    pub name: &'static str,
    pub kind: CardKind,
    pub value: u32,
    pub cost: u32,
    /// Relative offsets. For moves they are unit directions scaled by
    /// `value`; for attacks they are cells in front of the attacker.
    pub zone: &'static [Cell],
}

/// Max health plus the fixed deck for one character type.
#[derive(Debug)]
pub struct CharacterTemplate {
    pub character: CharacterType,
    pub max_health: u32,
    pub cards: &'static [Card],
}

impl CharacterTemplate {
    /// Finds the first card with this key.
    pub fn card(&self, key: &str) -> Option<&'static Card> {
        self.cards.iter().find(|card| card.key == key)
    }
}

/// Returns the template for a character type.
pub fn template(character: CharacterType) -> &'static CharacterTemplate {
    match character {
        CharacterType::Knight => &KNIGHT,
        CharacterType::Archer => &ARCHER,
        CharacterType::Rogue => &ROGUE,
    }
}

/// Builds a [`Card`] from a one-line table row. The zone is written as
/// `(dx, dy)` pairs.
macro_rules! card {
    ($key:literal, $name:literal, $kind:ident, $value:literal, $cost:literal, [$(($x:literal, $y:literal)),+ $(,)?]) => {
        Card {
            key: $key,
            name: $name,
            kind: CardKind::$kind,
            value: $value,
            cost: $cost,
            zone: &[$(Cell::new($x, $y)),+],
        }
    };
}

static KNIGHT: CharacterTemplate = CharacterTemplate {
    character: CharacterType::Knight,
    max_health: 150,
    cards: &[
        card!("L1", "Move Left", Move, 1, 0, [(-1, 0)]),
        card!("L1", "Move Left", Move, 1, 0, [(-1, 0)]),
        card!("R1", "Move Right", Move, 1, 0, [(1, 0)]),
        card!("R1", "Move Right", Move, 1, 0, [(1, 0)]),
        card!("U1", "Move Up", Move, 1, 0, [(0, 1)]),
        card!("U1", "Move Up", Move, 1, 0, [(0, 1)]),
        card!("D1", "Move Down", Move, 1, 0, [(0, -1)]),
        card!("D1", "Move Down", Move, 1, 0, [(0, -1)]),
        card!("B", "Block", Block, 15, 1, [(0, 0)]),
        card!("A", "Attack", Attack, 20, 0, [(1, 0)]),
        card!("S1", "Special 1", Attack, 30, 1, [(1, 0), (2, 0)]),
        card!("S2", "Special 2", Attack, 30, 2, [(1, 1), (1, 0), (1, -1)]),
        card!("ULT", "Ultimate", Attack, 90, 3, [(1, 0)]),
    ],
};

static ARCHER: CharacterTemplate = CharacterTemplate {
    character: CharacterType::Archer,
    max_health: 100,
    cards: &[
        card!("L1", "Move Left", Move, 1, 0, [(-1, 0)]),
        card!("L1", "Move Left", Move, 1, 0, [(-1, 0)]),
        card!("R1", "Move Right", Move, 1, 0, [(1, 0)]),
        card!("R1", "Move Right", Move, 1, 0, [(1, 0)]),
        card!("U1", "Move Up", Move, 1, 0, [(0, 1)]),
        card!("U1", "Move Up", Move, 1, 0, [(0, 1)]),
        card!("D1", "Move Down", Move, 1, 0, [(0, -1)]),
        card!("D1", "Move Down", Move, 1, 0, [(0, -1)]),
        card!("B", "Block", Block, 5, 1, [(0, 0)]),
        card!("A", "Attack", Attack, 10, 0, [(1, 0), (2, 0), (3, 0)]),
        card!("S1", "Special 1", Attack, 15, 1, [
            (2, -1), (2, 0), (2, 1),
            (3, -1), (3, 0), (3, 1),
        ]),
        card!("S2", "Special 2", Attack, 15, 2, [
            (1, 0), (2, 0), (3, 0), (4, 0), (5, 0), (6, 0),
        ]),
        card!("ULT", "Ultimate", Attack, 50, 3, [
            (4, -1), (4, 0), (4, 1),
            (5, -1), (5, 0), (5, 1),
            (6, -1), (6, 0), (6, 1),
        ]),
    ],
};

static ROGUE: CharacterTemplate = CharacterTemplate {
    character: CharacterType::Rogue,
    max_health: 120,
    cards: &[
        card!("L1", "Move Left", Move, 1, 0, [(-1, 0)]),
        card!("L2", "Jump Left", Move, 2, 0, [(-1, 0)]),
        card!("R1", "Move Right", Move, 1, 0, [(1, 0)]),
        card!("R2", "Jump Right", Move, 2, 0, [(1, 0)]),
        card!("U1", "Move Up", Move, 1, 0, [(0, 1)]),
        card!("U2", "Jump Up", Move, 2, 0, [(0, 1)]),
        card!("D1", "Move Down", Move, 1, 0, [(0, -1)]),
        card!("D2", "Jump Down", Move, 2, 0, [(0, -1)]),
        card!("B", "Block", Block, 10, 1, [(0, 0)]),
        card!("A", "Attack", Attack, 15, 0, [(1, 0), (2, 0)]),
        card!("S1", "Special 1", Attack, 20, 1, [(1, 0), (2, 1), (2, -1)]),
        card!("S2", "Special 2", Attack, 20, 2, [(0, 1), (0, -1), (3, 0)]),
        card!("ULT", "Ultimate", Attack, 40, 3, [
            (1, 1), (1, -1),
            (3, 1), (3, -1),
            (5, 1), (5, -1),
            (6, 0),
        ]),
    ],
};
