//! Persisted-store contract consumed by the engine.
//!
//! The engine never owns persistence. Hosts implement [`SaveStore`] over
//! whatever storage they use; [`MemorySave`] is the in-process version used
//! by the simulator and tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::economy::{EconomyCounters, PowerKind};

pub trait SaveStore {
    fn is_level_completed(&self, level_id: u32) -> bool;
    /// Records a clear. Stores the best star count seen so far.
    fn set_level_completed(&mut self, level_id: u32, stars: u8);
    fn get_nekoins(&self) -> u64;
    /// Deducts `amount` if affordable. Returns false and changes nothing otherwise.
    fn spend_nekoins(&mut self, amount: u32) -> bool;
    fn add_nekoins(&mut self, amount: u32);
    fn get_active_cards(&self) -> Vec<u32>;
    fn get_card_coin_value(&self, card_id: u32) -> u32;
    fn get_power_stock_level(&self, kind: PowerKind) -> u32;
    fn add_power_stock(&mut self, kind: PowerKind, amount: u32);
    /// Uses one unit of `kind`. Returns false when none is in stock.
    fn consume_power(&mut self, kind: PowerKind) -> bool;
    fn get_time_attack_upgrade_count(&self) -> u32;
    fn record_time_attack_upgrade(&mut self);
    fn get_gacha_pull_count(&self) -> u32;
    /// Counts a pull and unlocks `card_id` into the active pool.
    fn record_gacha_pull(&mut self, card_id: u32);

    fn counters(&self) -> EconomyCounters {
        EconomyCounters {
            hint_stock: self.get_power_stock_level(PowerKind::Hint),
            time_freeze_stock: self.get_power_stock_level(PowerKind::TimeFreeze),
            gacha_pulls: self.get_gacha_pull_count(),
            time_attack_upgrades: self.get_time_attack_upgrade_count(),
            nekoins: self.get_nekoins(),
        }
    }
}

/// Default coin value of a card with no explicit entry.
pub const DEFAULT_CARD_COIN_VALUE: u32 = 1;

/// Number of cards unlocked in a fresh save.
pub const STARTER_CARD_COUNT: u32 = 12;

/// In-memory save. Serializable so a host can snapshot it however it likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySave {
    nekoins: u64,
    /// level id -> best stars
    completed: BTreeMap<u32, u8>,
    active_cards: Vec<u32>,
    #[serde(default)]
    card_values: BTreeMap<u32, u32>,
    hint_stock: u32,
    time_freeze_stock: u32,
    time_attack_upgrades: u32,
    gacha_pulls: u32,
}

impl Default for MemorySave {
    fn default() -> Self {
        Self::new(0)
    }
}

impl MemorySave {
    pub fn new(nekoins: u64) -> Self {
        Self {
            nekoins,
            completed: BTreeMap::new(),
            active_cards: (0..STARTER_CARD_COUNT).collect(),
            card_values: BTreeMap::new(),
            hint_stock: 0,
            time_freeze_stock: 0,
            time_attack_upgrades: 0,
            gacha_pulls: 0,
        }
    }

    pub fn with_active_cards(mut self, cards: Vec<u32>) -> Self {
        self.active_cards = cards;
        self
    }

    pub fn with_card_value(mut self, card_id: u32, value: u32) -> Self {
        self.card_values.insert(card_id, value);
        self
    }

    pub fn with_power_stock(mut self, kind: PowerKind, amount: u32) -> Self {
        self.add_power_stock(kind, amount);
        self
    }

    pub fn best_stars(&self, level_id: u32) -> Option<u8> {
        self.completed.get(&level_id).copied()
    }
}

impl SaveStore for MemorySave {
    fn is_level_completed(&self, level_id: u32) -> bool {
        self.completed.contains_key(&level_id)
    }

    fn set_level_completed(&mut self, level_id: u32, stars: u8) {
        let best = self.completed.entry(level_id).or_insert(stars);
        *best = (*best).max(stars);
    }

    fn get_nekoins(&self) -> u64 {
        self.nekoins
    }

    fn spend_nekoins(&mut self, amount: u32) -> bool {
        if self.nekoins < amount as u64 {
            return false;
        }
        self.nekoins -= amount as u64;
        true
    }

    fn add_nekoins(&mut self, amount: u32) {
        self.nekoins = self.nekoins.saturating_add(amount as u64);
    }

    fn get_active_cards(&self) -> Vec<u32> {
        self.active_cards.clone()
    }

    fn get_card_coin_value(&self, card_id: u32) -> u32 {
        self.card_values
            .get(&card_id)
            .copied()
            .unwrap_or(DEFAULT_CARD_COIN_VALUE)
    }

    fn get_power_stock_level(&self, kind: PowerKind) -> u32 {
        match kind {
            PowerKind::Hint => self.hint_stock,
            PowerKind::TimeFreeze => self.time_freeze_stock,
        }
    }

    fn add_power_stock(&mut self, kind: PowerKind, amount: u32) {
        let slot = match kind {
            PowerKind::Hint => &mut self.hint_stock,
            PowerKind::TimeFreeze => &mut self.time_freeze_stock,
        };
        *slot = slot.saturating_add(amount);
    }

    fn consume_power(&mut self, kind: PowerKind) -> bool {
        let slot = match kind {
            PowerKind::Hint => &mut self.hint_stock,
            PowerKind::TimeFreeze => &mut self.time_freeze_stock,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    fn get_time_attack_upgrade_count(&self) -> u32 {
        self.time_attack_upgrades
    }

    fn record_time_attack_upgrade(&mut self) {
        self.time_attack_upgrades += 1;
    }

    fn get_gacha_pull_count(&self) -> u32 {
        self.gacha_pulls
    }

    fn record_gacha_pull(&mut self, card_id: u32) {
        self.gacha_pulls += 1;
        if !self.active_cards.contains(&card_id) {
            self.active_cards.push(card_id);
        }
    }
}
