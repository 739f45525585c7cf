pub mod codec;
pub mod error;
pub mod models;
pub mod parsing;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use codec::{creature::*, initiative::*};
pub use error::*;
pub use models::{alignment::*, combatant::*, creature::*};
pub use parsing::actions::{parse_action_list, render_action_list};
