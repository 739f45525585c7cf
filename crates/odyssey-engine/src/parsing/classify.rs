use std::sync::OnceLock;

use regex::Regex;

use super::{lines::LineRef, table::split_row};

static HEADING: OnceLock<Regex> = OnceLock::new();
static SECTION_LABEL: OnceLock<Regex> = OnceLock::new();

/// What a line looks like on its own, without reference to surrounding lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// `### Title`, any level from 1 to 6.
    Heading { level: u8, title: String },
    /// A bold upper-case line such as `**BONUS ACTIONS**`.
    SectionLabel { title: String },
    /// Three or more dashes and nothing else.
    Separator,
    TableRow { cells: Vec<String> },
    Text,
}

/// Classification of a single line containing only local facts.
#[derive(Debug, Clone)]
pub struct LineClass<'a> {
    pub number: usize,
    /// The untrimmed line, kept for free-text sections.
    pub raw: &'a str,
    pub kind: LineKind,
}

impl LineClass<'_> {
    /// The free-text section this line opens, if it is a heading or label
    /// with a known title.
    pub fn opens_section(&self) -> Option<Section> {
        section_opened_by(&self.kind)
    }
}

/// Named free-text sections of a stat block, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    PersonalityTrait,
    Actions,
    BonusActions,
    Reactions,
    LegendaryActions,
    Options,
    Description,
    Notes,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::PersonalityTrait,
        Section::Actions,
        Section::BonusActions,
        Section::Reactions,
        Section::LegendaryActions,
        Section::Options,
        Section::Description,
        Section::Notes,
    ];

    /// Heading title written by the renderer.
    pub fn title(self) -> &'static str {
        match self {
            Section::PersonalityTrait => "Personality Trait",
            Section::Actions => "Actions",
            Section::BonusActions => "Bonus Actions",
            Section::Reactions => "Reactions",
            Section::LegendaryActions => "Legendary Actions",
            Section::Options => "Options",
            Section::Description => "Description",
            Section::Notes => "Notes",
        }
    }

    /// Case-insensitive, so legacy `**LEGENDARY ACTIONS**` labels resolve too.
    pub fn from_title(title: &str) -> Option<Section> {
        let title = title.trim();
        Section::ALL
            .into_iter()
            .find(|s| s.title().eq_ignore_ascii_case(title))
    }

    /// Sections whose text is a list of named actions rather than prose.
    pub fn holds_actions(self) -> bool {
        matches!(
            self,
            Section::Actions
                | Section::BonusActions
                | Section::Reactions
                | Section::LegendaryActions
                | Section::Options
        )
    }
}

fn section_opened_by(kind: &LineKind) -> Option<Section> {
    match kind {
        LineKind::Heading { title, .. } => Section::from_title(without_closing_sequence(title)),
        LineKind::SectionLabel { title } => Section::from_title(title),
        _ => None,
    }
}

/// `Actions ##` -> `Actions`. A `#` run glued to the text (`C#`) belongs to it.
fn without_closing_sequence(title: &str) -> &str {
    let stripped = title.trim_end_matches('#');
    if stripped.len() < title.len() && stripped.ends_with(char::is_whitespace) {
        stripped.trim_end()
    } else {
        title
    }
}

/// Classifies individual lines of a stat block.
pub struct StatBlockLineClassifier;

impl StatBlockLineClassifier {
    pub fn classify<'a>(&self, lr: &LineRef<'a>) -> LineClass<'a> {
        LineClass {
            number: lr.number,
            raw: lr.text,
            kind: classify_text(lr.text),
        }
    }
}

fn classify_text(text: &str) -> LineKind {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-') {
        return LineKind::Separator;
    }

    let heading = HEADING
        .get_or_init(|| Regex::new(r"^(#{1,6})\s+(.*\S)$").expect("Invalid heading regex"));
    if let Some(caps) = heading.captures(trimmed) {
        return LineKind::Heading {
            // at most six
            level: caps[1].len() as u8,
            title: caps[2].trim().to_string(),
        };
    }

    let label = SECTION_LABEL.get_or_init(|| {
        Regex::new(r"^\*\*([A-Z][A-Z ]*)\*\*$").expect("Invalid section label regex")
    });
    if let Some(caps) = label.captures(trimmed) {
        return LineKind::SectionLabel {
            title: caps[1].trim().to_string(),
        };
    }

    match split_row(trimmed) {
        Some(cells) => LineKind::TableRow { cells },
        None => LineKind::Text,
    }
}

/// Whether a free-text line would be read as structure: a separator, or a
/// heading or label that opens a known section.
fn is_structural(text: &str) -> bool {
    let kind = classify_text(text);
    kind == LineKind::Separator || section_opened_by(&kind).is_some()
}

/// Escape one free-text line so it survives a round trip.
///
/// Structural lines get a leading `\`. Lines that already start with
/// backslashes in front of a structural line get one more, which keeps
/// [`unescape_line`] an exact inverse.
pub fn escape_line(line: &str) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];
    if is_structural(body.trim_start_matches('\\')) {
        format!("{indent}\\{body}")
    } else {
        line.to_string()
    }
}

/// Remove the backslash added by [`escape_line`].
pub fn unescape_line(line: &str) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];
    match body.strip_prefix('\\') {
        Some(rest) if is_structural(rest.trim_start_matches('\\')) => format!("{indent}{rest}"),
        _ => line.to_string(),
    }
}

/// Escape every line of a free-text block.
pub fn escape_free_text(text: &str) -> String {
    text.split('\n')
        .map(escape_line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kind(text: &str) -> LineKind {
        classify_text(text)
    }

    #[test]
    fn headings_keep_level_and_title() {
        assert_eq!(
            kind("### Goblin Boss"),
            LineKind::Heading {
                level: 3,
                title: "Goblin Boss".to_string()
            }
        );
        assert_eq!(
            kind("# C#"),
            LineKind::Heading {
                level: 1,
                title: "C#".to_string()
            }
        );
    }

    #[rstest]
    #[case("Notes", "Notes")]
    #[case("Notes ##", "Notes")]
    #[case("C#", "C#")]
    #[case("Sharp #", "Sharp")]
    fn closing_hashes_need_a_space(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(without_closing_sequence(title), expected);
    }

    #[rstest]
    #[case("#hashtag")]
    #[case("####### Seven")]
    #[case("**Armor Class** 15")]
    #[case("Small Humanoid, Neutral Evil")]
    #[case("--")]
    #[case("- **Speed** 30 ft.")]
    fn plain_lines_are_text(#[case] line: &str) {
        assert_eq!(kind(line), LineKind::Text);
    }

    #[rstest]
    #[case("---")]
    #[case("  -----  ")]
    fn dash_runs_are_separators(#[case] line: &str) {
        assert_eq!(kind(line), LineKind::Separator);
    }

    #[test]
    fn upper_case_bold_line_is_a_section_label() {
        assert_eq!(
            kind("**LEGENDARY ACTIONS**"),
            LineKind::SectionLabel {
                title: "LEGENDARY ACTIONS".to_string()
            }
        );
        assert_eq!(kind("**Multiattack.**"), LineKind::Text);
    }

    #[test]
    fn pipe_lines_are_rows() {
        assert_eq!(
            kind("| STR | DEX |"),
            LineKind::TableRow {
                cells: vec!["STR".to_string(), "DEX".to_string()]
            }
        );
    }

    #[test]
    fn only_known_titles_open_sections() {
        fn line(text: &str) -> LineClass<'_> {
            StatBlockLineClassifier.classify(&LineRef { number: 1, text })
        }
        assert_eq!(line("### Bonus Actions").opens_section(), Some(Section::BonusActions));
        assert_eq!(line("## Notes ##").opens_section(), Some(Section::Notes));
        assert_eq!(line("**NOTES**").opens_section(), Some(Section::Notes));
        assert_eq!(line("### Lair").opens_section(), None);
        assert_eq!(line("**TREASURE**").opens_section(), None);
    }

    #[rstest]
    #[case("---", r"\---")]
    #[case("  ---", r"  \---")]
    #[case("### Actions", r"\### Actions")]
    #[case("**REACTIONS**", r"\**REACTIONS**")]
    #[case(r"\---", r"\\---")]
    #[case("### Lair", "### Lair")]
    #[case(r"C:\path", r"C:\path")]
    #[case(r"\just a backslash", r"\just a backslash")]
    fn escape_and_unescape_are_inverse(#[case] line: &str, #[case] escaped: &str) {
        assert_eq!(escape_line(line), escaped);
        assert_eq!(unescape_line(escaped), line);
    }

    #[test]
    fn escaped_lines_classify_as_text() {
        assert_eq!(kind(r"\---"), LineKind::Text);
        assert_eq!(kind(r"\### Actions"), LineKind::Text);
    }
}
