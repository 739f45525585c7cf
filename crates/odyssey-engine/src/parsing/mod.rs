pub mod actions;
pub mod builder;
pub mod classify;
pub mod fields;
pub mod lines;
pub mod table;

pub use builder::StatBlockBuilder;
pub use classify::{LineClass, LineKind, Section, StatBlockLineClassifier};
pub use lines::{LineRef, lines_with_numbers};

use crate::models::CreatureDraft;

/// Run the classifier and the builder over every line of a stat block.
pub fn parse_stat_block(text: &str) -> CreatureDraft {
    let classifier = StatBlockLineClassifier;
    let mut builder = StatBlockBuilder::new();

    for lr in lines_with_numbers(text) {
        let lc = classifier.classify(&lr);
        builder.push(&lc);
    }

    builder.finish()
}
