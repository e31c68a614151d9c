//! Splitting a simfile into tags.
//!
//! The lexer knows nothing about tag semantics. It finds `#NAME:value;` entries and skips `//`
//! comments between them. A `\`-escaped character stays in the value as written. A missing `;`
//! is recovered by ending the value at the next line starting with `#`.

use super::{SmWarning, SmWarningWithRange, WithRange};

/// A `#NAME:value;` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Tag name without `#`, as written.
    pub name: &'a str,
    /// Raw value between `:` and `;`, comments included.
    pub value: &'a str,
    /// Byte range of the whole entry.
    pub range: std::ops::Range<usize>,
    /// Byte range of the value.
    pub value_range: std::ops::Range<usize>,
}

impl Tag<'_> {
    /// Whether the tag name is `name`, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Lexer output, includes tags and warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexOutput<'a> {
    /// Tags in order of appearance.
    pub tags: Vec<Tag<'a>>,
    /// Warnings that occurred during lexing.
    pub warnings: Vec<SmWarningWithRange>,
}

struct Cursor<'a> {
    source: &'a str,
    index: usize,
}

impl<'a> Cursor<'a> {
    const fn new(source: &'a str) -> Self {
        Self { source, index: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.index..]
    }

    fn is_end(&self) -> bool {
        self.index >= self.source.len()
    }

    /// Index of the end of the current line, excluding `\n`.
    fn line_end(&self) -> usize {
        self.rest()
            .find('\n')
            .map_or(self.source.len(), |i| self.index + i)
    }

    /// Skips whitespaces and comments.
    fn skip_trivia(&mut self) {
        loop {
            let trimmed = self.rest().trim_start();
            self.index = self.source.len() - trimmed.len();
            if trimmed.starts_with("//") {
                self.index = self.line_end();
            } else {
                break;
            }
        }
    }

    /// Whether the line after the `\n` at `newline` starts with `#`, ignoring indentation.
    fn next_line_starts_tag(&self, newline: usize) -> bool {
        self.source[newline + 1..]
            .trim_start_matches([' ', '\t', '\r'])
            .starts_with('#')
    }

    /// Scans a tag value from the current index. Returns the end index of the value and whether
    /// it was terminated by `;`, which is consumed. A character after `\` never ends the value.
    fn scan_value(&mut self) -> (usize, bool) {
        let bytes = self.source.as_bytes();
        while self.index < bytes.len() {
            match bytes[self.index] {
                b';' => {
                    let end = self.index;
                    self.index += 1;
                    return (end, true);
                }
                b'\\' => self.index = (self.index + 2).min(bytes.len()),
                b'/' if bytes.get(self.index + 1) == Some(&b'/') => {
                    self.index = self.line_end();
                }
                b'\n' if self.next_line_starts_tag(self.index) => {
                    let end = self.index;
                    self.index += 1;
                    return (end, false);
                }
                _ => self.index += 1,
            }
        }
        (self.source.len(), false)
    }
}

/// Splits the simfile source into tags.
pub fn lex(source: &str) -> LexOutput<'_> {
    let mut cursor = Cursor::new(source);
    let mut tags = Vec::new();
    let mut warnings = Vec::new();

    loop {
        cursor.skip_trivia();
        if cursor.is_end() {
            break;
        }
        let start = cursor.index;
        if !cursor.rest().starts_with('#') {
            let end = cursor.line_end();
            warnings.push(WithRange::new(
                SmWarning::StrayText(source[start..end].trim().to_owned()),
                start..end,
            ));
            cursor.index = end;
            continue;
        }

        let name_start = start + 1;
        let Some(name_len) = source[name_start..].find([':', ';', '\n']) else {
            warnings.push(WithRange::new(
                SmWarning::ExpectedColon(source[name_start..].trim().to_owned()),
                start..source.len(),
            ));
            break;
        };
        let name_end = name_start + name_len;
        let name = source[name_start..name_end].trim();
        match source.as_bytes()[name_end] {
            b':' => {
                cursor.index = name_end + 1;
                let value_start = cursor.index;
                let (value_end, terminated) = cursor.scan_value();
                if !terminated {
                    warnings.push(WithRange::new(
                        SmWarning::MissingSemicolon(name.to_owned()),
                        start..value_end,
                    ));
                }
                tags.push(Tag {
                    name,
                    value: &source[value_start..value_end],
                    range: start..cursor.index,
                    value_range: value_start..value_end,
                });
            }
            b';' => {
                cursor.index = name_end + 1;
                tags.push(Tag {
                    name,
                    value: "",
                    range: start..cursor.index,
                    value_range: name_end..name_end,
                });
            }
            _ => {
                warnings.push(WithRange::new(
                    SmWarning::ExpectedColon(name.to_owned()),
                    start..name_end,
                ));
                cursor.index = name_end;
            }
        }
    }

    LexOutput { tags, warnings }
}
