//! Action lists written as paragraphs.
//!
//! Each action is a paragraph starting with a bold-italic name ending in a
//! period: `***Multiattack.*** The goblin makes two attacks.` The plain bold
//! form `**Multiattack.** ...` is also read. Paragraphs that do not start a
//! new action continue the previous action's description.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::Action;

static BOLD_ITALIC_NAME: OnceLock<Regex> = OnceLock::new();
static BOLD_NAME: OnceLock<Regex> = OnceLock::new();

/// Split a paragraph's first line into an action name and the rest of the line.
fn action_start(line: &str) -> Option<(String, String)> {
    let bold_italic = BOLD_ITALIC_NAME.get_or_init(|| {
        Regex::new(r"^\*\*\*(.+?)\*\*\*\s*(.*)$").expect("Invalid action name regex")
    });
    let bold = BOLD_NAME.get_or_init(|| {
        Regex::new(r"^\*\*([^*]+?\.)\*\*\s*(.*)$").expect("Invalid bold action name regex")
    });

    let line = line.trim_start();
    let caps = bold_italic.captures(line).or_else(|| bold.captures(line))?;
    let name = caps[1].trim();
    let name = name.strip_suffix('.').unwrap_or(name).trim();
    Some((name.to_string(), caps[2].to_string()))
}

/// Parse an action list. Never fails: text before the first named action
/// becomes an action with an empty name so it is not lost.
pub fn parse_action_list(text: &str) -> Vec<Action> {
    let mut actions: Vec<Action> = Vec::new();

    for paragraph in paragraphs(text) {
        let (first, rest) = match paragraph.split_once('\n') {
            Some((first, rest)) => (first, Some(rest)),
            None => (paragraph.as_str(), None),
        };

        if let Some((name, lead)) = action_start(first) {
            let description = match rest {
                Some(rest) => format!("{lead}\n{rest}"),
                None => lead,
            };
            actions.push(Action::new(name, description.trim()));
            continue;
        }

        match actions.last_mut() {
            Some(current) if !current.description.is_empty() => {
                current.description.push_str("\n\n");
                current.description.push_str(paragraph.trim());
            }
            Some(current) => current.description = paragraph.trim().to_string(),
            None => actions.push(Action::new("", paragraph.trim())),
        }
    }
    actions
}

/// Render an action list in the form [`parse_action_list`] reads.
///
/// Actions without a name render as bare description paragraphs; such a
/// paragraph only reads back as its own action when it comes first.
pub fn render_action_list(actions: &[Action]) -> String {
    actions
        .iter()
        .filter_map(|action| {
            let name = action.name.trim();
            let description = action.description.trim();
            match (name.is_empty(), description.is_empty()) {
                (true, true) => None,
                (true, false) => Some(description.to_string()),
                (false, true) => Some(format!("***{name}.***")),
                (false, false) => Some(format!("***{name}.*** {description}")),
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Blank-line separated paragraphs, each with its lines joined by `\n`.
fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}
