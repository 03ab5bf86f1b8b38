use std::str::FromStr;

use crate::schema::TableSchema;

const BOM: char = '\u{feff}';

/// A row that could not be mapped onto its table schema
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("{table}.csv line {line_no}: expected {expected} columns, found {found}")]
    MissingColumns {
        table: &'static str,
        line_no: usize,
        expected: usize,
        found: usize,
    },

    #[error("{table}.csv line {line_no}: invalid {column} value {value:?}")]
    InvalidValue {
        table: &'static str,
        line_no: usize,
        column: &'static str,
        value: String,
    },
}

/// A typed row of one of the source tables
pub trait Record: Sized {
    fn schema() -> &'static TableSchema;
    fn from_fields(fields: &Fields<'_>) -> Result<Self, RowError>;
}

/// The comma separated values of a single row, addressed by column position
pub struct Fields<'a> {
    schema: &'static TableSchema,
    line_no: usize,
    values: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    pub fn split(line: &'a str, schema: &'static TableSchema, line_no: usize) -> Self {
        let line = clean_line(line);
        Self {
            schema,
            line_no,
            values: line.split(',').collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw text of a column
    pub fn text(&self, idx: usize) -> String {
        self.values.get(idx).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Numeric value of a column; surrounding whitespace is ignored
    pub fn parse<T: FromStr>(&self, idx: usize) -> Result<T, RowError> {
        let raw = self.values.get(idx).copied().unwrap_or_default();
        raw.trim().parse().map_err(|_| RowError::InvalidValue {
            table: self.schema.name,
            line_no: self.line_no,
            column: self.schema.columns.get(idx).map(|c| c.name).unwrap_or("?"),
            value: raw.to_string(),
        })
    }
}

/// Strip the byte order mark and a trailing carriage return
fn clean_line(line: &str) -> &str {
    let line = line.strip_prefix(BOM).unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// True when the row's first field is the table's header sentinel
pub fn is_header(line: &str, schema: &TableSchema) -> bool {
    let first = clean_line(line).split(',').next().unwrap_or_default();
    first.trim() == schema.header_sentinel()
}

/// Parse a CSV data row into a typed record
pub fn parse_row<R: Record>(line: &str, line_no: usize) -> Result<R, RowError> {
    let schema = R::schema();
    let fields = Fields::split(line, schema, line_no);

    if fields.len() < schema.columns.len() {
        return Err(RowError::MissingColumns {
            table: schema.name,
            line_no,
            expected: schema.columns.len(),
            found: fields.len(),
        });
    }

    R::from_fields(&fields)
}
