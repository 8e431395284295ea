//! Append-only G-code program text.
//!
//! Every emitter takes a [`GcodeProgram`] by value and hands back the
//! extended program, so a program is threaded through a generation run
//! without shared mutable state. Fragments are only ever appended; nothing
//! already written is rewritten.

use std::fmt;

/// Accumulated G-code text for one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GcodeProgram {
    text: String,
}

impl GcodeProgram {
    /// Create an empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line followed by a newline.
    pub fn push_line(mut self, line: impl AsRef<str>) -> Self {
        self.text.push_str(line.as_ref());
        self.text.push('\n');
        self
    }

    /// Append an empty line.
    pub fn push_blank(mut self) -> Self {
        self.text.push('\n');
        self
    }

    /// Append a `; ` comment line.
    pub fn push_comment(self, comment: impl AsRef<str>) -> Self {
        let line = format!("; {}", comment.as_ref());
        self.push_line(line)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Lines that carry a command, with any trailing comment removed.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.text
            .lines()
            .map(|line| match line.split_once(';') {
                Some((command, _)) => command.trim(),
                None => line.trim(),
            })
            .filter(|command| !command.is_empty())
    }

    /// Count commands whose first word is `word` (e.g. `M750`).
    pub fn count_command(&self, word: &str) -> usize {
        self.commands()
            .filter(|command| command.split_whitespace().next() == Some(word))
            .count()
    }
}

impl fmt::Display for GcodeProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<GcodeProgram> for String {
    fn from(program: GcodeProgram) -> Self {
        program.into_string()
    }
}
