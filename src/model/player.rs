/// Players and the per-map roster
///
/// Fixtures refer to their owner by player number. Numbers that are not in
/// the roster still resolve, to a placeholder with an empty name, so a map
/// whose roster comes after its units (or is missing entirely) still loads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Number used for the independent (unowned) player
pub const INDEPENDENT_NUMBER: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub number: i32,
    pub name: String,
}

impl Player {
    pub fn new(number: i32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }

    pub fn independent() -> Self {
        Self::new(INDEPENDENT_NUMBER, "independent")
    }

    pub fn is_independent(&self) -> bool {
        self.number == INDEPENDENT_NUMBER
    }
}

/// Roster of players on one map, keyed by number
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerCollection {
    players: BTreeMap<i32, Player>,
    current: Option<i32>,
}

impl PlayerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a player
    pub fn add(&mut self, player: Player) {
        debug!("Adding player {} ('{}')", player.number, player.name);
        self.players.insert(player.number, player);
    }

    /// Look up a player by number, falling back to an unnamed placeholder
    pub fn get_player(&self, number: i32) -> Player {
        match self.players.get(&number) {
            Some(player) => player.clone(),
            None if number == INDEPENDENT_NUMBER => Player::independent(),
            None => Player::new(number, ""),
        }
    }

    pub fn contains(&self, number: i32) -> bool {
        self.players.contains_key(&number)
    }

    /// The roster's independent player, or the default one
    pub fn independent(&self) -> Player {
        self.players
            .values()
            .find(|p| p.is_independent())
            .cloned()
            .unwrap_or_else(Player::independent)
    }

    pub fn set_current(&mut self, number: i32) {
        self.current = Some(number);
    }

    pub fn current_number(&self) -> Option<i32> {
        self.current
    }

    pub fn current(&self) -> Option<Player> {
        self.current.map(|n| self.get_player(n))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
