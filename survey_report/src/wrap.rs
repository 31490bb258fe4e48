/// Prose split into lines that never cut through a sentence.
///
/// Every line keeps its delimiters (the `". "` after a sentence, a trailing
/// newline), so joining the lines gives back the original text.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct WrappedText {
    lines: Vec<String>,
}

impl WrappedText {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The lines as they should be drawn, without trailing whitespace.
    /// A paragraph break shows up as an empty line.
    pub fn display_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.trim_end())
    }

    pub fn reconstruct(&self) -> String {
        self.lines.concat()
    }
}

// A segment ends right after a ". " delimiter or after a newline.
fn split_segments(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut segments: Vec<&str> = Vec::new();
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        let is_end = match c {
            '\n' => true,
            ' ' => idx > 0 && bytes[idx - 1] == b'.',
            _ => false,
        };
        if is_end {
            segments.push(&text[start..idx + 1]);
            start = idx + 1;
        }
    }
    if start < text.len() {
        segments.push(&text[start..]);
    }
    segments
}

/// Groups whole sentences into lines of at most `max_width` characters.
///
/// A sentence longer than `max_width` gets a line of its own and overflows.
/// Newlines always end the current line.
pub fn wrap_sentences(text: &str, max_width: usize) -> WrappedText {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for segment in split_segments(text) {
        let width = segment.trim_end_matches('\n').chars().count();
        if !current.is_empty() && current_width + width > max_width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push_str(segment);
        current_width += width;
        if segment.ends_with('\n') {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    WrappedText { lines }
}

/// Wraps a short label on word boundaries. Words are never broken, even if
/// they are longer than `max_width`.
pub fn wrap_words(text: &str, max_width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
