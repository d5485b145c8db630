//! Raw parser output, grouped by schema the way DBML documents are.

pub const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Database {
    /// `public` first, then other schemas in order of first appearance.
    pub schemas: Vec<SchemaDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDecl {
    pub name: String,
    pub tables: Vec<TableDecl>,
    pub refs: Vec<RefDecl>,
    pub enums: Vec<EnumDecl>,
}

impl SchemaDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
            refs: Vec::new(),
            enums: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDecl {
    pub name: String,
    pub schema_name: Option<String>,
    pub alias: Option<String>,
    pub header_color: Option<String>,
    pub note: Option<String>,
    pub fields: Vec<FieldDecl>,
}

/// Column type as the parser saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Identifier type, e.g. `varchar(255)` has `type_name = "varchar(255)"`
    /// and `args = Some("255")`.
    Structured {
        type_name: String,
        args: Option<String>,
    },
    /// Double-quoted type such as `"timestamp with time zone"`.
    Plain(String),
    Absent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub field_type: FieldType,
    pub pk: bool,
    pub unique: bool,
    pub not_null: bool,
    pub increment: bool,
    pub default: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefDecl {
    pub name: Option<String>,
    pub endpoints: [EndpointDecl; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDecl {
    pub schema_name: Option<String>,
    pub table_name: String,
    pub field_names: Vec<String>,
    /// `"1"` or `"*"`.
    pub relation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationOp {
    ManyToOne,  // >
    OneToMany,  // <
    OneToOne,   // -
    ManyToMany, // <>
}

impl RelationOp {
    /// Relation symbols for the (left, right) endpoints.
    pub fn symbols(self) -> (&'static str, &'static str) {
        match self {
            RelationOp::ManyToOne => ("*", "1"),
            RelationOp::OneToMany => ("1", "*"),
            RelationOp::OneToOne => ("1", "1"),
            RelationOp::ManyToMany => ("*", "*"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub values: Vec<String>,
}
