//! `prices` command: escalating shop prices.

use crate::error::CliError;
use crate::ui;
use nekomemo_engine::economy::{PowerKind, gacha_cost, power_price, time_attack_upgrade_cost};
use std::io::Write;

/// Handle the prices command.
///
/// Prints the price of each power for every stock level, then the first
/// `count` gacha pulls and time-attack upgrades. Upgrades past the cap show
/// as `max`.
pub fn handle_prices_command(count: u32, out: &mut dyn Write) -> Result<(), CliError> {
    if count == 0 {
        return Err(CliError::InvalidInput("count must be >= 1".to_string()));
    }

    writeln!(out, "Powers (price of the next unit by stock owned)")?;
    for kind in PowerKind::all() {
        let cells: Vec<String> = (0..=kind.max_stock())
            .map(|stock| ui::price_cell(power_price(kind, stock)))
            .collect();
        writeln!(out, "  {:<11} {}", kind.name(), cells.join(" "))?;
    }

    writeln!(out, "Gacha (pull n)")?;
    let gacha: Vec<String> = (0..count).map(|n| gacha_cost(n).to_string()).collect();
    writeln!(out, "  {}", gacha.join(" "))?;

    writeln!(out, "Time-attack upgrades (upgrade n)")?;
    let upgrades: Vec<String> = (0..count)
        .map(|n| ui::price_cell(time_attack_upgrade_cost(n)))
        .collect();
    writeln!(out, "  {}", upgrades.join(" "))?;
    Ok(())
}
