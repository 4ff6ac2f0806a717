//! Plain-text grid tables.

use unicode_width::UnicodeWidthStr;

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Pad on the right.
    Left,
    /// Pad on the left; used for numbers.
    Right,
}

/// A grid table rendered with `+---+` borders and an `=` rule under the
/// header row.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a table with the given header cells and per-column alignment.
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Self {
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            aligns: columns.iter().map(|(_, a)| *a).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with empty cells, extra cells are
    /// dropped.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| display_width(&row[i]))
                    .chain(std::iter::once(display_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Renders the table without a trailing newline.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let rule = |fill: char| -> String {
            let mut line = String::from("+");
            for width in &widths {
                line.extend(std::iter::repeat(fill).take(width + 2));
                line.push('+');
            }
            line
        };
        let line = |cells: &[String], aligns: &[Align]| -> String {
            let mut out = String::from("|");
            for ((cell, width), align) in cells.iter().zip(&widths).zip(aligns) {
                let pad = width - display_width(cell);
                match align {
                    Align::Left => out.push_str(&format!(" {}{} |", cell, " ".repeat(pad))),
                    Align::Right => out.push_str(&format!(" {}{} |", " ".repeat(pad), cell)),
                }
            }
            out
        };

        let header_aligns = vec![Align::Left; self.headers.len()];
        let mut lines = vec![rule('-'), line(&self.headers, &header_aligns), rule('=')];
        for row in &self.rows {
            lines.push(line(row, &self.aligns));
            lines.push(rule('-'));
        }
        if self.rows.is_empty() {
            lines.pop();
            lines.push(rule('-'));
        }

        lines.join("\n")
    }
}

/// Terminal columns taken by `text`; CJK and other wide glyphs count twice.
fn display_width(text: &str) -> usize {
    text.width()
}
