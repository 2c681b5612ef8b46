use crate::stmt::{ColumnIndex, ParameterIndex, TableIndex};

/// A monotonically increasing counter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexGenerator {
    next: usize,
}

impl IndexGenerator {
    /// Returns the current value and advances the counter.
    pub fn allocate(&mut self) -> usize {
        let index = self.next;
        self.next += 1;
        index
    }

    /// The value the next call to [`allocate`](Self::allocate) returns.
    pub fn peek(&self) -> usize {
        self.next
    }
}

/// The table, column, and parameter counters of one compilation.
///
/// Each compilation owns its generators and threads them by `&mut`; sharing
/// one set between compilations would interleave their indices.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexGenerators {
    pub table: IndexGenerator,
    pub column: IndexGenerator,
    pub parameter: IndexGenerator,
}

impl IndexGenerators {
    pub fn new() -> IndexGenerators {
        IndexGenerators::default()
    }

    pub fn table(&mut self) -> TableIndex {
        TableIndex(self.table.allocate())
    }

    pub fn column(&mut self) -> ColumnIndex {
        ColumnIndex(self.column.allocate())
    }

    pub fn parameter(&mut self) -> ParameterIndex {
        ParameterIndex(self.parameter.allocate())
    }
}
