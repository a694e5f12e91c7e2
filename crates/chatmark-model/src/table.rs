//! Tables, rows and cells.
//!
//! Span invariants are checked when the [`Table`] is assembled: every body row
//! must cover exactly the header's column count.

use crate::error::StructureError;
use crate::node::{Node, require_inline};

/// Horizontal alignment of a table column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A table cell of inline content spanning one or more columns.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cell {
    span: usize,
    children: Vec<Node>,
}

impl Cell {
    /// Single-column cell.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidChild`] if a child is a block.
    pub fn new(children: Vec<Node>) -> Result<Self, StructureError> {
        require_inline("table cell", &children)?;
        Ok(Self { span: 1, children })
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            span: 1,
            children: vec![Node::text(text)],
        }
    }

    /// Make the cell span `span` columns.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::ZeroColspan`] when `span` is 0.
    pub fn spanning(mut self, span: usize) -> Result<Self, StructureError> {
        if span == 0 {
            return Err(StructureError::ZeroColspan);
        }
        self.span = span;
        Ok(self)
    }

    #[must_use]
    pub fn span(&self) -> usize {
        self.span
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    #[must_use]
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Row of single-column text cells.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: texts.into_iter().map(Cell::text).collect(),
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of columns the row covers.
    #[must_use]
    pub fn span_sum(&self) -> usize {
        self.cells.iter().map(Cell::span).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Table {
    caption: Option<String>,
    alignments: Vec<Alignment>,
    header: Row,
    rows: Vec<Row>,
}

impl Table {
    /// Assemble a table, left-aligning every column.
    ///
    /// # Errors
    ///
    /// - [`StructureError::EmptyHeader`] if the header has no cells.
    /// - [`StructureError::RowSpan`] if a row does not cover the header's columns.
    pub fn new(header: Row, rows: Vec<Row>) -> Result<Self, StructureError> {
        let columns = header.span_sum();
        if columns == 0 {
            return Err(StructureError::EmptyHeader);
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Row::span_sum)
            .enumerate()
            .find(|&(_, sum)| sum != columns)
        {
            return Err(StructureError::RowSpan {
                row,
                expected: columns,
                found,
            });
        }
        Ok(Self {
            caption: None,
            alignments: vec![Alignment::default(); columns],
            header,
            rows,
        })
    }

    /// Table from row-major strings, one cell per column.
    ///
    /// ```
    /// use chatmark_model::Table;
    ///
    /// let table = Table::from_strings(&["A", "B"], &[vec!["1", "2"]]).unwrap();
    /// assert_eq!(table.columns(), 2);
    /// assert!(Table::from_strings(&["A", "B"], &[vec!["1"]]).is_err());
    /// ```
    pub fn from_strings<S: AsRef<str>>(
        header: &[S],
        rows: &[Vec<S>],
    ) -> Result<Self, StructureError> {
        let texts = |cells: &[S]| Row::from_texts(cells.iter().map(|c| c.as_ref().to_owned()));
        Self::new(texts(header), rows.iter().map(|r| texts(r.as_slice())).collect())
    }

    /// Set per-column alignment.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::AlignmentCount`] unless exactly one alignment
    /// per column is given.
    pub fn with_alignments(mut self, alignments: Vec<Alignment>) -> Result<Self, StructureError> {
        if alignments.len() != self.columns() {
            return Err(StructureError::AlignmentCount {
                expected: self.columns(),
                found: alignments.len(),
            });
        }
        self.alignments = alignments;
        Ok(self)
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Column count, the header's span sum.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.alignments.len()
    }

    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    #[must_use]
    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    #[must_use]
    pub fn header(&self) -> &Row {
        &self.header
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Whether any header or body cell spans more than one column.
    #[must_use]
    pub fn has_spans(&self) -> bool {
        std::iter::once(&self.header)
            .chain(&self.rows)
            .flat_map(Row::cells)
            .any(|c| c.span > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_row_is_rejected() {
        let err = Table::from_strings(&["A", "B", "C"], &[vec!["1", "2", "3"], vec!["4", "5"]])
            .unwrap_err();
        assert_eq!(
            err,
            StructureError::RowSpan {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_long_row_is_rejected() {
        assert!(Table::from_strings(&["A"], &[vec!["1", "2"]]).is_err());
    }

    #[test]
    fn test_spans_count_towards_columns() {
        let header = Row::from_texts(["A", "B", "C"]);
        let row = Row::new(vec![Cell::text("wide").spanning(2).unwrap(), Cell::text("c")]);
        let table = Table::new(header, vec![row]).unwrap();
        assert_eq!(table.columns(), 3);
        assert!(table.has_spans());
    }

    #[test]
    fn test_zero_span_is_rejected() {
        assert_eq!(
            Cell::text("x").spanning(0).unwrap_err(),
            StructureError::ZeroColspan
        );
    }

    #[test]
    fn test_empty_header_is_rejected() {
        assert_eq!(
            Table::new(Row::default(), vec![]).unwrap_err(),
            StructureError::EmptyHeader
        );
    }

    #[test]
    fn test_alignment_count_must_match() {
        let table = Table::from_strings(&["A", "B"], &[]).unwrap();
        assert_eq!(table.alignments(), &[Alignment::Left, Alignment::Left]);
        let err = table
            .clone()
            .with_alignments(vec![Alignment::Right])
            .unwrap_err();
        assert_eq!(
            err,
            StructureError::AlignmentCount {
                expected: 2,
                found: 1
            }
        );
        let aligned = table
            .with_alignments(vec![Alignment::Center, Alignment::Right])
            .unwrap();
        assert_eq!(aligned.alignments()[1], Alignment::Right);
    }

    #[test]
    fn test_cell_rejects_block_content() {
        let block = Node::code_block("x", None);
        assert!(Cell::new(vec![block]).is_err());
    }
}
