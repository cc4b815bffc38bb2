use serde::{Deserialize, Serialize};

use crate::level::{stars_for, LevelConfig};

/// Stars and fixed completion reward of a cleared level.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub stars: u8,
    pub reward: u32,
}

/// Converts a victory into stars and the level's completion reward.
///
/// Pure: reads only its arguments and the fixed reward table. The coin bonus
/// accrued while matching is added by the caller.
///
/// # Examples
///
/// ```
/// use nekomemo_engine::level::configure;
/// use nekomemo_engine::reward::calculate;
///
/// let level = configure(0).unwrap();
/// let r = calculate(&level, level.time_limit_secs, true);
/// assert_eq!(r.stars, 3);
/// assert_eq!(r.reward, 80);
/// ```
pub fn calculate(level: &LevelConfig, time_remaining: f32, is_first_clear: bool) -> Reward {
    let stars = stars_for(time_remaining, level.time_limit_secs);
    let row = level.difficulty.reward_row();
    let mut reward = row.base + (stars as u32 - 1) * row.per_star;
    if is_first_clear {
        reward += row.first_clear;
    }
    Reward { stars, reward }
}

/// Nekoins paid per grid cleared in time-attack.
pub const TIME_ATTACK_REWARD_PER_GRID: u32 = 20;

/// Payout of a finished time-attack run before any ad doubling.
pub fn time_attack_reward(grids_completed: u32, coin_bonus: u32) -> u32 {
    grids_completed
        .saturating_mul(TIME_ATTACK_REWARD_PER_GRID)
        .saturating_add(coin_bonus)
}
