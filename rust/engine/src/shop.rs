//! Caller-side purchase protocol on top of the price curves.
//!
//! Each purchase reads the counter, prices it, asks the save to deduct the
//! currency, and only then applies the effect. A refused deduction leaves
//! the save untouched.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;

use crate::economy::{gacha_cost, power_price, time_attack_upgrade_cost, PowerKind};
use crate::save::SaveStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PurchaseOutcome {
    Purchased { price: u32 },
    InsufficientFunds { price: u32, balance: u64 },
    /// Counter is at its cap, or nothing can be bought
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GachaOutcome {
    Pulled { price: u32, card_id: u32 },
    InsufficientFunds { price: u32, balance: u64 },
    /// Empty pool
    Unavailable,
}

fn charge<S: SaveStore + ?Sized>(save: &mut S, price: u32) -> Result<(), PurchaseOutcome> {
    if save.spend_nekoins(price) {
        return Ok(());
    }
    let balance = save.get_nekoins();
    tracing::warn!(price, balance, "purchase refused: insufficient nekoins");
    Err(PurchaseOutcome::InsufficientFunds { price, balance })
}

pub fn buy_power<S: SaveStore + ?Sized>(save: &mut S, kind: PowerKind) -> PurchaseOutcome {
    let Some(price) = power_price(kind, save.get_power_stock_level(kind)) else {
        return PurchaseOutcome::Unavailable;
    };
    if let Err(refused) = charge(save, price) {
        return refused;
    }
    save.add_power_stock(kind, 1);
    tracing::debug!(power = kind.name(), price, "power purchased");
    PurchaseOutcome::Purchased { price }
}

pub fn buy_time_attack_upgrade<S: SaveStore + ?Sized>(save: &mut S) -> PurchaseOutcome {
    let Some(price) = time_attack_upgrade_cost(save.get_time_attack_upgrade_count()) else {
        return PurchaseOutcome::Unavailable;
    };
    if let Err(refused) = charge(save, price) {
        return refused;
    }
    save.record_time_attack_upgrade();
    PurchaseOutcome::Purchased { price }
}

/// Pays for one pull and unlocks a card drawn uniformly from `pool`.
pub fn pull_gacha<S, R>(save: &mut S, pool: &[u32], rng: &mut R) -> GachaOutcome
where
    S: SaveStore + ?Sized,
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return GachaOutcome::Unavailable;
    }
    let price = gacha_cost(save.get_gacha_pull_count());
    if let Err(PurchaseOutcome::InsufficientFunds { price, balance }) = charge(save, price) {
        return GachaOutcome::InsufficientFunds { price, balance };
    }
    let Some(&card_id) = pool.choose(rng) else {
        return GachaOutcome::Unavailable;
    };
    save.record_gacha_pull(card_id);
    GachaOutcome::Pulled { price, card_id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::MemorySave;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn power_purchase_deducts_and_stocks() {
        let mut save = MemorySave::new(260);
        assert_eq!(
            buy_power(&mut save, PowerKind::Hint),
            PurchaseOutcome::Purchased { price: 100 }
        );
        assert_eq!(save.get_power_stock_level(PowerKind::Hint), 1);
        assert_eq!(save.get_nekoins(), 160);
        assert_eq!(
            buy_power(&mut save, PowerKind::Hint),
            PurchaseOutcome::Purchased { price: 150 }
        );
        assert_eq!(
            buy_power(&mut save, PowerKind::Hint),
            PurchaseOutcome::InsufficientFunds {
                price: 220,
                balance: 10
            }
        );
        assert_eq!(save.get_power_stock_level(PowerKind::Hint), 2);
        assert_eq!(save.get_nekoins(), 10);
    }

    #[test]
    fn full_stock_is_unavailable() {
        let mut save =
            MemorySave::new(10_000).with_power_stock(PowerKind::TimeFreeze, 3);
        assert_eq!(
            buy_power(&mut save, PowerKind::TimeFreeze),
            PurchaseOutcome::Unavailable
        );
        assert_eq!(save.get_nekoins(), 10_000);
    }

    #[test]
    fn upgrades_follow_curve_until_cap() {
        let mut save = MemorySave::new(1_000_000);
        let mut prices = Vec::new();
        loop {
            match buy_time_attack_upgrade(&mut save) {
                PurchaseOutcome::Purchased { price } => prices.push(price),
                other => {
                    assert_eq!(other, PurchaseOutcome::Unavailable);
                    break;
                }
            }
        }
        assert_eq!(prices.len(), 10);
        assert!(prices.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(save.get_time_attack_upgrade_count(), 10);
    }

    #[test]
    fn gacha_escalates_and_unlocks() {
        let mut save = MemorySave::new(200).with_active_cards(vec![]);
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let pool = [70, 71, 72];
        let first = pull_gacha(&mut save, &pool, &mut rng);
        let GachaOutcome::Pulled { price, card_id } = first else {
            panic!("expected a pull, got {:?}", first);
        };
        assert_eq!(price, 50);
        assert!(pool.contains(&card_id));
        assert!(save.get_active_cards().contains(&card_id));
        assert!(matches!(
            pull_gacha(&mut save, &pool, &mut rng),
            GachaOutcome::Pulled { price: 60, .. }
        ));
        assert!(matches!(
            pull_gacha(&mut save, &pool, &mut rng),
            GachaOutcome::Pulled { price: 80, .. }
        ));
        assert_eq!(save.get_gacha_pull_count(), 3);
        assert_eq!(save.get_nekoins(), 10);
    }

    #[test]
    fn gacha_refusal_changes_nothing() {
        let mut save = MemorySave::new(49).with_active_cards(vec![]);
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        assert_eq!(
            pull_gacha(&mut save, &[1], &mut rng),
            GachaOutcome::InsufficientFunds {
                price: 50,
                balance: 49
            }
        );
        assert_eq!(save.get_gacha_pull_count(), 0);
        assert!(save.get_active_cards().is_empty());
        assert_eq!(
            pull_gacha(&mut save, &[], &mut rng),
            GachaOutcome::Unavailable
        );
    }
}
