//! RawBlock: the data lines of one fetched daily file.

/// Data lines of one source day, header already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Name of the text file the lines came from (used in warnings).
    pub file_name: String,
    pub lines: Vec<String>,
}

impl RawBlock {
    /// Split a file's text into lines and drop everything before `start_line`
    /// (1-based).
    pub fn from_text(file_name: impl Into<String>, text: &str, start_line: usize) -> Self {
        let skip = start_line.saturating_sub(1);
        Self {
            file_name: file_name.into(),
            lines: text.lines().skip(skip).map(str::to_string).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lines_are_skipped() {
        let text = "# header\n# header\n2020 01 01 0000 a\n2020 01 01 0001 b\n";
        let block = RawBlock::from_text("f.txt", text, 3);
        assert_eq!(block.lines.len(), 2);
        assert!(block.lines[0].ends_with(" a"));
    }

    #[test]
    fn start_line_one_keeps_everything() {
        let block = RawBlock::from_text("f.txt", "a\nb", 1);
        assert_eq!(block.lines, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn header_longer_than_file_yields_empty_block() {
        let block = RawBlock::from_text("f.txt", "a\nb", 10);
        assert!(block.is_empty());
    }
}
