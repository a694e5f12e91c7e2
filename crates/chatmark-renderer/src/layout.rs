//! Fixed-width table layout for dialects without native table markup.
//!
//! Column widths are measured in characters. A cell spanning several columns
//! occupies their summed width plus the separators between them; when its
//! text is wider than that, the last spanned column grows to fit.

use chatmark_model::Alignment;

/// Separator between cells in the bordered grid: `" | "`.
const GRID_SEPARATOR: usize = 3;
/// Separator between cells in the plain grid: two spaces.
const PLAIN_SEPARATOR: usize = 2;

/// One laid-out cell: single-line text and its column span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutCell {
    text: String,
    span: usize,
}

impl LayoutCell {
    /// Cell spanning `span` columns. Newlines collapse to spaces and a span
    /// of 0 is treated as 1.
    #[must_use]
    pub fn new(text: &str, span: usize) -> Self {
        Self {
            text: text.replace(['\r', '\n'], " "),
            span: span.max(1),
        }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

impl From<&str> for LayoutCell {
    fn from(text: &str) -> Self {
        Self::new(text, 1)
    }
}

/// Monospaced table layout.
///
/// ```
/// use chatmark_renderer::TableLayout;
///
/// let layout = TableLayout::from_texts(&["A", "Name"], &[vec!["1", "Ada"]]);
/// assert_eq!(layout.widths(), vec![1, 4]);
/// assert_eq!(layout.render_plain(), "A  Name\n1  Ada ");
/// ```
#[derive(Clone, Debug)]
pub struct TableLayout {
    columns: usize,
    alignments: Vec<Alignment>,
    header: Vec<LayoutCell>,
    rows: Vec<Vec<LayoutCell>>,
}

impl TableLayout {
    /// Layout over the header's column count. Short rows are padded with
    /// empty cells, missing alignments default to left and extra ones are
    /// ignored.
    #[must_use]
    pub fn new(
        header: Vec<LayoutCell>,
        mut rows: Vec<Vec<LayoutCell>>,
        alignments: &[Alignment],
    ) -> Self {
        let columns = header.iter().map(|c| c.span).sum();
        for row in &mut rows {
            let covered: usize = row.iter().map(|c| c.span).sum();
            row.extend((covered..columns).map(|_| LayoutCell::new("", 1)));
        }
        let mut alignments: Vec<Alignment> = alignments.iter().copied().take(columns).collect();
        alignments.resize(columns, Alignment::default());
        Self {
            columns,
            alignments,
            header,
            rows,
        }
    }

    /// Left-aligned layout of single-column text cells.
    pub fn from_texts<S: AsRef<str>>(header: &[S], rows: &[Vec<S>]) -> Self {
        let cells = |texts: &[S]| {
            texts
                .iter()
                .map(|t| LayoutCell::from(t.as_ref()))
                .collect::<Vec<_>>()
        };
        Self::new(
            cells(header),
            rows.iter().map(|r| cells(r.as_slice())).collect(),
            &[],
        )
    }

    /// Column widths for the bordered grid.
    #[must_use]
    pub fn widths(&self) -> Vec<usize> {
        self.widths_with(GRID_SEPARATOR)
    }

    fn all_rows(&self) -> impl Iterator<Item = &Vec<LayoutCell>> {
        std::iter::once(&self.header).chain(&self.rows)
    }

    fn widths_with(&self, separator: usize) -> Vec<usize> {
        let mut widths = vec![1; self.columns];
        for row in self.all_rows() {
            let mut col = 0;
            for cell in row {
                if cell.span == 1 && col < self.columns {
                    widths[col] = widths[col].max(cell.width());
                }
                col += cell.span;
            }
        }
        for row in self.all_rows() {
            let mut col = 0;
            for cell in row.iter() {
                let end = (col + cell.span).min(self.columns);
                if cell.span > 1 && col < end {
                    let available = span_width(&widths[col..end], separator);
                    if cell.width() > available {
                        widths[end - 1] += cell.width() - available;
                    }
                }
                col += cell.span;
            }
        }
        widths
    }

    /// Bordered grid, suitable for wrapping in a code block.
    #[must_use]
    pub fn render_grid(&self) -> String {
        let widths = self.widths_with(GRID_SEPARATOR);
        let mut border = String::from("+");
        for w in &widths {
            border.push_str(&"-".repeat(w + 2));
            border.push('+');
        }

        let mut lines = vec![border.clone()];
        lines.push(self.grid_row(&self.header, &widths));
        lines.push(border.clone());
        for row in &self.rows {
            lines.push(self.grid_row(row, &widths));
        }
        if !self.rows.is_empty() {
            lines.push(border);
        }
        lines.join("\n")
    }

    fn grid_row(&self, row: &[LayoutCell], widths: &[usize]) -> String {
        let mut line = String::from("|");
        for (col, cell) in self.placed(row) {
            let end = (col + cell.span).min(self.columns);
            let width = span_width(&widths[col..end], GRID_SEPARATOR);
            line.push(' ');
            line.push_str(&pad(&cell.text, width, self.alignments[col]));
            line.push_str(" |");
        }
        line
    }

    /// Borderless grid with columns separated by two spaces. Every line has
    /// the same width, so trailing padding is kept.
    #[must_use]
    pub fn render_plain(&self) -> String {
        let widths = self.widths_with(PLAIN_SEPARATOR);
        self.all_rows()
            .map(|row| {
                self.placed(row)
                    .map(|(col, cell)| {
                        let end = (col + cell.span).min(self.columns);
                        let width = span_width(&widths[col..end], PLAIN_SEPARATOR);
                        pad(&cell.text, width, self.alignments[col])
                    })
                    .collect::<Vec<_>>()
                    .join("  ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Cells paired with their starting column, dropping any that start past
    /// the last column.
    fn placed<'a>(
        &self,
        row: &'a [LayoutCell],
    ) -> impl Iterator<Item = (usize, &'a LayoutCell)> + use<'a> {
        let columns = self.columns;
        row.iter()
            .scan(0, |col, cell| {
                let start = *col;
                *col += cell.span;
                Some((start, cell))
            })
            .filter(move |(start, _)| *start < columns)
    }
}

/// Width of consecutive columns joined by separators.
fn span_width(widths: &[usize], separator: usize) -> usize {
    widths.iter().sum::<usize>() + separator * widths.len().saturating_sub(1)
}

fn pad(text: &str, width: usize, alignment: Alignment) -> String {
    let fill = width.saturating_sub(text.chars().count());
    let (left, right) = match alignment {
        Alignment::Left => (0, fill),
        Alignment::Right => (fill, 0),
        Alignment::Center => (fill / 2, fill - fill / 2),
    };
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}
