/// Column data type as it appears in the CSV source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Real => write!(f, "real"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
}

impl Column {
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            col_type: ColumnType::Integer,
        }
    }

    pub const fn real(name: &'static str) -> Self {
        Self {
            name,
            col_type: ColumnType::Real,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            col_type: ColumnType::Text,
        }
    }
}

/// Foreign key reference
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub const fn new(
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table,
            references_column,
        }
    }
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub source_file: &'static str,
    /// Columns in CSV order; rows are mapped by position
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
}

impl TableSchema {
    /// Name of the first column, used to recognise the header row
    pub fn header_sentinel(&self) -> &'static str {
        self.columns.first().map(|c| c.name).unwrap_or_default()
    }

    /// Position of a column in the CSV row
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
