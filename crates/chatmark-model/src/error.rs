//! Error types for document construction and dialect selection.

/// A node violated a structural invariant at construction time.
///
/// Raised by the validated constructors in this crate and by the
/// [`DocumentBuilder`](crate::DocumentBuilder). A rejected construction never
/// yields a partially built tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StructureError {
    /// A container received a child it cannot hold (e.g. a paragraph inside bold text).
    #[error("{container} cannot contain {child}")]
    InvalidChild {
        /// Kind of the rejecting container.
        container: &'static str,
        /// Kind of the rejected child.
        child: &'static str,
    },

    /// Heading level outside `1..=3`.
    #[error("invalid heading level {0}, expected 1, 2 or 3")]
    HeadingLevel(u8),

    /// Table cell with a column span of zero.
    #[error("column span must be at least 1")]
    ZeroColspan,

    /// Table header without any cells.
    #[error("table header must have at least one cell")]
    EmptyHeader,

    /// A table row whose cell spans do not add up to the header's column count.
    #[error("row {row} spans {found} columns, header has {expected}")]
    RowSpan {
        /// Zero-based index of the offending body row.
        row: usize,
        /// Column count of the header.
        expected: usize,
        /// Sum of the row's cell spans.
        found: usize,
    },

    /// Per-column alignment list does not match the column count.
    #[error("{found} column alignments given for {expected} columns")]
    AlignmentCount {
        /// Column count of the header.
        expected: usize,
        /// Number of alignments supplied.
        found: usize,
    },

    /// Ordered lists count from 1 up to a nine-digit start.
    #[error("ordered list cannot start at index {0}")]
    ListIndex(u64),

    /// A list item operation was issued while no list was open.
    #[error("no list is open to receive {0}")]
    NoOpenList(&'static str),
}

/// A dialect name did not match any supported target dialect.
///
/// Indicates a caller or configuration defect, never a data defect.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported dialect: {name:?}")]
pub struct UnsupportedDialectError {
    /// The name that failed to resolve.
    pub name: String,
}

impl UnsupportedDialectError {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }
}
