//! Initiative tracker blocks.
//!
//! ```text
//! Round: 3
//! | Name | Initiative | Damage |
//! |---|---|---|
//! | Orc | 15 | 4 |
//! | Imp | 9 | 0 |
//! ```

use crate::{
    models::{Combatant, InitiativeState},
    parsing::table::{escape_cell, format_row, is_alignment_row, split_row},
};

const HEADER: [&str; 3] = ["Name", "Initiative", "Damage"];

/// Parse an initiative table. Text without a recognizable table yields an
/// empty tracker at round 1.
pub fn parse_initiative_table(text: &str) -> InitiativeState {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let round = lines.first().and_then(|line| parse_round(line)).unwrap_or(1);

    let Some(header) = lines.windows(2).position(|pair| is_header(pair[0], pair[1])) else {
        log::debug!("no initiative table found");
        return InitiativeState::default();
    };

    let mut state = InitiativeState::new(round);
    for line in &lines[header + 2..] {
        match parse_row(line) {
            Some(combatant) => state.combatants.push(combatant),
            None => {
                log::debug!("initiative table ends at {line:?}");
                break;
            }
        }
    }
    state
}

/// `Round: 3`. Values below 1 are raised to 1.
fn parse_round(line: &str) -> Option<u32> {
    let value = line.strip_prefix("Round:")?.trim();
    match value.parse::<i64>() {
        Ok(round) => Some(round.clamp(1, u32::MAX as i64) as u32),
        Err(_) => {
            log::debug!("round {value:?} is not a number");
            None
        }
    }
}

fn is_header(line: &str, next: &str) -> bool {
    let Some(cells) = split_row(line) else {
        return false;
    };
    HEADER.iter().all(|label| cells.iter().any(|c| c == label))
        && split_row(next).is_some_and(|cells| is_alignment_row(&cells))
}

fn parse_row(line: &str) -> Option<Combatant> {
    let cells: Vec<String> = split_row(line)?
        .into_iter()
        .filter(|cell| !cell.is_empty())
        .collect();
    let [name, initiative, damage, ..] = cells.as_slice() else {
        return None;
    };
    let initiative = initiative.parse::<i32>().ok()?;
    let damage = damage.parse::<u32>().ok()?;
    Combatant::new(name, initiative, damage).ok()
}

/// Write the tracker as a table, combatants in turn order.
pub fn stringify_initiative_table(state: &InitiativeState) -> String {
    let mut out = format!("Round: {}\n", state.round);
    out.push_str(&format_row(&HEADER));
    out.push('\n');
    out.push_str("|---|---|---|\n");
    for c in state.turn_order() {
        let row = [
            escape_cell(&c.name),
            c.initiative.to_string(),
            c.damage.to_string(),
        ];
        out.push_str(&format_row(&row));
        out.push('\n');
    }
    out
}

/// Starting state for an editing session: the parsed block, or an empty
/// tracker when the block has no text yet.
pub fn seed_tracker(block: Option<&str>) -> InitiativeState {
    match block {
        Some(text) if !text.trim().is_empty() => parse_initiative_table(text),
        _ => InitiativeState::default(),
    }
}
