//! Escalating shop prices.
//!
//! Every price here is a pure function of a purchase counter read from the
//! save collaborator. `None` means "not purchasable any more". Deducting the
//! currency and bumping the counter is the caller's job (see [`crate::shop`]).

use serde::{Deserialize, Serialize};

/// Consumable powers the player can stock up on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum PowerKind {
    /// Points out one unmatched pair
    Hint,
    /// Stops the countdown for a while
    TimeFreeze,
}

impl PowerKind {
    pub fn all() -> [PowerKind; 2] {
        [PowerKind::Hint, PowerKind::TimeFreeze]
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerKind::Hint => "hint",
            PowerKind::TimeFreeze => "time_freeze",
        }
    }

    pub fn price_table(self) -> &'static [u32] {
        match self {
            PowerKind::Hint => &HINT_PRICES,
            PowerKind::TimeFreeze => &TIME_FREEZE_PRICES,
        }
    }

    /// Units one player may hold. Past the end of its price table a power
    /// keeps selling at the last listed price.
    pub fn max_stock(self) -> u32 {
        match self {
            PowerKind::Hint => 7,
            PowerKind::TimeFreeze => 3,
        }
    }
}

const HINT_PRICES: [u32; 5] = [100, 150, 220, 300, 400];
const TIME_FREEZE_PRICES: [u32; 3] = [150, 220, 300];

/// Price of the next unit of `kind` when `stock` units are already owned.
///
/// # Examples
///
/// ```
/// use nekomemo_engine::economy::{power_price, PowerKind};
///
/// assert_eq!(power_price(PowerKind::Hint, 0), Some(100));
/// assert_eq!(power_price(PowerKind::Hint, 6), Some(400));
/// assert_eq!(power_price(PowerKind::Hint, 7), None);
/// ```
pub fn power_price(kind: PowerKind, stock: u32) -> Option<u32> {
    if stock >= kind.max_stock() {
        return None;
    }
    let table = kind.price_table();
    let idx = (stock as usize).min(table.len() - 1);
    Some(table[idx])
}

/// Price curve whose increment alternates between two amounts.
///
/// `cost(n) = base + Σ_{i<n} (i even ? inc_odd : inc_even)`; the naming
/// follows the 1st, 3rd, 5th... purchase paying `inc_odd` extra.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AlternatingCurve {
    pub base: u32,
    pub inc_odd: u32,
    pub inc_even: u32,
    /// Purchases allowed in total; `None` for unbounded
    pub cap: Option<u32>,
}

impl AlternatingCurve {
    /// Cost of the purchase made after `n` earlier purchases.
    pub fn cost(&self, n: u32) -> Option<u32> {
        if let Some(cap) = self.cap {
            if n >= cap {
                return None;
            }
        }
        let full_cycles = n / 2;
        let odd_extra = n % 2;
        let total = self.base as u64
            + full_cycles as u64 * (self.inc_odd as u64 + self.inc_even as u64)
            + odd_extra as u64 * self.inc_odd as u64;
        Some(total.min(u32::MAX as u64) as u32)
    }

    /// The first `count` costs, stopping early at the cap.
    pub fn sequence(&self, count: u32) -> Vec<u32> {
        (0..count).map_while(|n| self.cost(n)).collect()
    }
}

pub const GACHA_CURVE: AlternatingCurve = AlternatingCurve {
    base: 50,
    inc_odd: 10,
    inc_even: 20,
    cap: None,
};

pub const TIME_ATTACK_UPGRADE_CURVE: AlternatingCurve = AlternatingCurve {
    base: 100,
    inc_odd: 50,
    inc_even: 100,
    cap: Some(10),
};

pub fn gacha_cost(pulls: u32) -> u32 {
    // uncapped curve, cost() is always Some
    GACHA_CURVE.cost(pulls).unwrap_or(u32::MAX)
}

pub fn time_attack_upgrade_cost(upgrades: u32) -> Option<u32> {
    TIME_ATTACK_UPGRADE_CURVE.cost(upgrades)
}

/// Snapshot of the purchase counters kept by the save collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyCounters {
    pub hint_stock: u32,
    pub time_freeze_stock: u32,
    pub gacha_pulls: u32,
    pub time_attack_upgrades: u32,
    pub nekoins: u64,
}

/// Every price the shop would currently show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceSheet {
    pub hint: Option<u32>,
    pub time_freeze: Option<u32>,
    pub gacha: u32,
    pub time_attack_upgrade: Option<u32>,
}

pub fn price_sheet(counters: &EconomyCounters) -> PriceSheet {
    PriceSheet {
        hint: power_price(PowerKind::Hint, counters.hint_stock),
        time_freeze: power_price(PowerKind::TimeFreeze, counters.time_freeze_stock),
        gacha: gacha_cost(counters.gacha_pulls),
        time_attack_upgrade: time_attack_upgrade_cost(counters.time_attack_upgrades),
    }
}
