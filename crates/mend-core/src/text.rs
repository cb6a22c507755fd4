//! Line lookup and position/offset conversion for a text snapshot.

use lsp_types::{Position, Range};

/// Pre-computed line start offsets for a particular text snapshot.
///
/// Lines are split on `\n`; a trailing `\r` is treated as part of the line
/// terminator so CRLF documents convert the same way LF documents do.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    text_len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(128);
        line_starts.push(0);
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            text_len: text.len(),
        }
    }

    #[inline]
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    #[inline]
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.line_starts.get(line as usize).copied()
    }

    /// End of the line's text, excluding the `\n` (and a preceding `\r`).
    fn line_text_end(&self, text: &str, line: u32) -> Option<usize> {
        let line = line as usize;
        let end = match self.line_starts.get(line + 1) {
            Some(next_start) => {
                let mut end = next_start - 1;
                if end > self.line_starts[line] && text.as_bytes()[end - 1] == b'\r' {
                    end -= 1;
                }
                end
            }
            None => self.text_len,
        };
        if line < self.line_starts.len() {
            Some(end)
        } else {
            None
        }
    }

    /// Convert an LSP position (UTF-16 column) into a byte offset.
    ///
    /// `text` must be the same snapshot used to construct this [`LineIndex`].
    ///
    /// Returns `None` if the line is out of bounds, the character is past the
    /// end of the line, or the character points inside a surrogate pair. The
    /// one-past-the-last-line position `(line_count, 0)` maps to the end of
    /// the text so that whole-document ranges resolve.
    pub fn offset_at(&self, text: &str, position: Position) -> Option<usize> {
        debug_assert_eq!(text.len(), self.text_len);
        if position.line as usize == self.line_starts.len() && position.character == 0 {
            return Some(self.text_len);
        }

        let line_start = self.line_start(position.line)?;
        let line_end = self.line_text_end(text, position.line)?;
        if position.character == 0 {
            return Some(line_start);
        }

        let line_text = &text[line_start..line_end];
        let mut utf16 = 0u32;
        for (byte_idx, ch) in line_text.char_indices() {
            if utf16 == position.character {
                return Some(line_start + byte_idx);
            }
            let ch_utf16 = ch.len_utf16() as u32;
            if utf16 + ch_utf16 > position.character {
                // Inside a surrogate pair.
                return None;
            }
            utf16 += ch_utf16;
        }

        if utf16 == position.character {
            Some(line_end)
        } else {
            None
        }
    }

    /// The range covering exactly one line: from the start of `line` to the
    /// start of the next line. For the last line the end is `(line + 1, 0)`,
    /// which [`LineIndex::offset_at`] resolves to the end of the text.
    pub fn line_range(&self, line: u32) -> Option<Range> {
        if line >= self.line_count() {
            return None;
        }
        Some(Range::new(
            Position::new(line, 0),
            Position::new(line + 1, 0),
        ))
    }

    /// The whole-document range, from `(0, 0)` to one past the last line.
    pub fn full_range(&self) -> Range {
        Range::new(
            Position::new(0, 0),
            Position::new(self.line_count(), 0),
        )
    }
}
