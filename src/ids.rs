//! Diagram element ids.
//!
//! Container ids are `<table>parent`, header ids `<table>.header` and field
//! ids `<table>.<field>`. A `.` is what separates a field id from a table id.

const CONTAINER_SUFFIX: &str = "parent";
const HEADER_SUFFIX: &str = "header";

pub fn container_id(table: &str) -> String {
    format!("{}{}", table, CONTAINER_SUFFIX)
}

pub fn header_id(table: &str) -> String {
    format!("{}.{}", table, HEADER_SUFFIX)
}

pub fn field_id(table: &str, field: &str) -> String {
    format!("{}.{}", table, field)
}

/// A diagram element addressed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementId {
    Table(String),
    Header(String),
    Field { table: String, field: String },
}

impl ElementId {
    /// Parse a locator id: `table`, `table.header` or `table.field`.
    pub fn parse(id: &str) -> Self {
        match id.split_once('.') {
            Some((table, HEADER_SUFFIX)) => ElementId::Header(table.to_string()),
            Some((table, field)) => ElementId::Field {
                table: table.to_string(),
                field: field.to_string(),
            },
            None => ElementId::Table(id.to_string()),
        }
    }

    /// Parse an id emitted by the graph builder, where a dot-free id is a
    /// container id. A bare table name ending in `parent` reads as a
    /// container id here; callers holding the table list disambiguate.
    pub fn from_node_id(id: &str) -> Self {
        if !id.contains('.') {
            if let Some(table) = id.strip_suffix(CONTAINER_SUFFIX) {
                if !table.is_empty() {
                    return ElementId::Table(table.to_string());
                }
            }
        }
        Self::parse(id)
    }

    /// The table that owns this element.
    pub fn table_name(&self) -> &str {
        match self {
            ElementId::Table(t) | ElementId::Header(t) => t,
            ElementId::Field { table, .. } => table,
        }
    }
}
