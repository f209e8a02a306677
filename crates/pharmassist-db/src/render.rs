//! Text rendering of schema and query results for model prompts.
//!
//! Results render as a list of tuples (`[('a', 1), ('b', None)]`), the
//! shape the narration prompt is written against.

use serde_json::{Map, Value};
use std::fmt;

/// Longest string value kept in a query result before word truncation
pub const MAX_STRING_LENGTH: usize = 300;

/// Longest sample value shown in the schema text
pub const MAX_SAMPLE_LENGTH: usize = 100;

/// Sample rows shown per table
pub const SAMPLE_ROWS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    /// Group `(table, column)` pairs into tables, keeping first-seen order
    pub fn group(columns: impl IntoIterator<Item = (String, ColumnInfo)>) -> Vec<TableInfo> {
        let mut tables: Vec<TableInfo> = Vec::new();

        for (table, column) in columns {
            match tables.last_mut() {
                Some(last) if last.name == table => last.columns.push(column),
                _ => tables.push(TableInfo {
                    name: table,
                    columns: vec![column],
                }),
            }
        }

        tables
    }

    pub fn create_statement(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.nullable {
                    format!("\t{} {}", c.name, c.data_type.to_uppercase())
                } else {
                    format!("\t{} {} NOT NULL", c.name, c.data_type.to_uppercase())
                }
            })
            .collect();

        format!("CREATE TABLE {} (\n{}\n)", self.name, columns.join(",\n"))
    }

    /// Schema block for one table: DDL plus a comment with sample rows
    pub fn describe(&self, sample_rows: &[Map<String, Value>]) -> String {
        let header: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();

        let rows: Vec<String> = sample_rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| {
                        let value = row.get(&c.name).unwrap_or(&Value::Null);
                        sample_value(value).chars().take(MAX_SAMPLE_LENGTH).collect::<String>()
                    })
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect();

        let mut block = format!(
            "{}\n\n/*\n{} rows from {} table:\n{}",
            self.create_statement(),
            SAMPLE_ROWS,
            self.name,
            header.join("\t")
        );
        for row in rows {
            block.push('\n');
            block.push_str(&row);
        }
        block.push_str("\n*/");
        block
    }
}

fn sample_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One decoded cell of a query result
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact numeric, kept as its decimal text
    Decimal(String),
    Text(String),
    /// Column type the gateway cannot decode; holds the type name
    Unsupported(String),
}

impl CellValue {
    /// Shorten long text to `max` characters at a word boundary
    pub fn truncated(self, max: usize) -> Self {
        match self {
            Self::Text(s) => Self::Text(truncate_word(&s, max)),
            other => other,
        }
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "None"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{:?}", x),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Text(s) => write!(f, "{}", quote(s)),
            Self::Unsupported(type_name) => write!(f, "<{}>", type_name),
        }
    }
}

/// Single-quoted literal; double quotes when the text holds a single quote only
fn quote(s: &str) -> String {
    let delimiter = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

pub fn truncate_word(s: &str, max: usize) -> String {
    const SUFFIX: &str = "...";

    if s.chars().count() <= max {
        return s.to_string();
    }

    let keep: String = s.chars().take(max.saturating_sub(SUFFIX.len())).collect();
    let cut = match keep.rfind(' ') {
        Some(idx) => &keep[..idx],
        None => keep.as_str(),
    };
    format!("{}{}", cut, SUFFIX)
}

/// Render result rows; an empty result renders as an empty string
pub fn render_rows(rows: &[Vec<CellValue>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let tuples: Vec<String> = rows
        .iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            if cells.len() == 1 {
                format!("({},)", cells[0])
            } else {
                format!("({})", cells.join(", "))
            }
        })
        .collect();

    format!("[{}]", tuples.join(", "))
}
