/// A single line of block text with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRef<'a> {
    pub number: usize,
    /// Line text without the newline or a trailing `\r`.
    pub text: &'a str,
}

/// Returns an iterator over the lines of `text`.
///
/// Splits on `\n` only so that a trailing empty line is still reported;
/// Windows line endings are normalized by dropping the `\r`.
pub fn lines_with_numbers(text: &str) -> impl Iterator<Item = LineRef<'_>> {
    text.split('\n').enumerate().map(|(i, line)| LineRef {
        number: i + 1,
        text: line.strip_suffix('\r').unwrap_or(line),
    })
}
