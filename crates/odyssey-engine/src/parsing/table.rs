//! Pipe table rows.
//!
//! A row is a trimmed line that starts and ends with `|`. Cells are split on
//! unescaped pipes and trimmed; `\|` inside a cell is a literal pipe.

use std::sync::OnceLock;

use regex::Regex;

static ALIGNMENT_CELL: OnceLock<Regex> = OnceLock::new();

/// Split a pipe row into its cells, or `None` if the line is not a row.
pub fn split_row(line: &str) -> Option<Vec<String>> {
    let line = line.trim();
    if line.len() < 2 || !line.starts_with('|') || !line.ends_with('|') {
        return None;
    }
    let inner = &line[1..line.len() - 1];

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(ch),
        }
    }
    cells.push(cell.trim().to_string());
    Some(cells)
}

/// Whether every cell is a dash run such as `---`, `:--`, or `:-:`.
pub fn is_alignment_row(cells: &[String]) -> bool {
    let re = ALIGNMENT_CELL
        .get_or_init(|| Regex::new(r"^:?-+:?$").expect("Invalid alignment cell regex"));
    !cells.is_empty() && cells.iter().all(|c| re.is_match(c))
}

/// Escape a value for use inside a cell. Cells are single-line, so newlines
/// are folded into spaces.
pub fn escape_cell(value: &str) -> String {
    value
        .replace(['\r', '\n'], " ")
        .replace('|', "\\|")
}

/// Render cells as a row: `| a | b |`.
pub fn format_row<S: AsRef<str>>(cells: &[S]) -> String {
    let mut row = String::from("|");
    for cell in cells {
        row.push(' ');
        row.push_str(cell.as_ref());
        row.push_str(" |");
    }
    row
}

/// `**Label**` -> `Label`; anything else is returned trimmed.
pub fn strip_bold(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix("**")
        .and_then(|c| c.strip_suffix("**"))
        .unwrap_or(cell)
        .trim()
}
