//! Normalized schema consumed by the diagram builder.
//!
//! Only the first schema of a document is read; tables and refs that live in
//! other schemas are dropped here.

use serde::Serialize;

use crate::ast::{Database, EndpointDecl, FieldDecl, FieldType, RefDecl, SchemaDecl, TableDecl};

pub const UNKNOWN_TYPE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Schema {
    pub tables: Vec<Table>,
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_color: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub declared_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    pub endpoints: [Endpoint; 2],
}

impl Reference {
    pub fn source(&self) -> &Endpoint {
        &self.endpoints[0]
    }

    pub fn target(&self) -> &Endpoint {
        &self.endpoints[1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub table_name: String,
    pub field_names: Vec<String>,
    pub relation_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("parser produced no document")]
    MissingRoot,
    #[error("document contains no schemas")]
    NoSchemas,
}

/// Resolve a declared type to its display label. Never empty.
pub fn resolve_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Structured { type_name, .. } if !type_name.trim().is_empty() => type_name.clone(),
        FieldType::Plain(s) if !s.trim().is_empty() => s.clone(),
        _ => UNKNOWN_TYPE.to_string(),
    }
}

impl Schema {
    pub fn try_from_database(db: Option<&Database>) -> Result<Self, AdapterError> {
        let db = db.ok_or(AdapterError::MissingRoot)?;
        let first = db.schemas.first().ok_or(AdapterError::NoSchemas)?;
        Ok(Self::from_schema_decl(first))
    }

    /// Adapt parser output, degrading to an empty schema when the document
    /// root is missing or has no schemas.
    pub fn from_database(db: Option<&Database>) -> Self {
        match Self::try_from_database(db) {
            Ok(schema) => schema,
            Err(err) => {
                tracing::warn!(error = %err, "malformed parser output, using empty schema");
                Self::default()
            }
        }
    }

    fn from_schema_decl(decl: &SchemaDecl) -> Self {
        let mut references: Vec<Reference> = decl.refs.iter().map(Reference::from).collect();
        // Ref endpoints may name a table by its `as` alias.
        for endpoint in references.iter_mut().flat_map(|r| r.endpoints.iter_mut()) {
            if decl.tables.iter().any(|t| t.name == endpoint.table_name) {
                continue;
            }
            let aliased = decl
                .tables
                .iter()
                .find(|t| t.alias.as_deref() == Some(endpoint.table_name.as_str()));
            if let Some(table) = aliased {
                endpoint.table_name = table.name.clone();
            }
        }
        Self {
            tables: decl.tables.iter().map(Table::from).collect(),
            references,
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn field_count(&self) -> usize {
        self.tables.iter().map(|t| t.fields.len()).sum()
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

impl From<&TableDecl> for Table {
    fn from(decl: &TableDecl) -> Self {
        Self {
            name: decl.name.clone(),
            header_color: decl.header_color.clone(),
            fields: decl.fields.iter().map(Field::from).collect(),
        }
    }
}

impl From<&FieldDecl> for Field {
    fn from(decl: &FieldDecl) -> Self {
        Self {
            name: decl.name.clone(),
            declared_type: resolve_type(&decl.field_type),
            note: decl.note.clone(),
        }
    }
}

impl From<&RefDecl> for Reference {
    fn from(decl: &RefDecl) -> Self {
        let [a, b] = &decl.endpoints;
        Self {
            endpoints: [Endpoint::from(a), Endpoint::from(b)],
        }
    }
}

impl From<&EndpointDecl> for Endpoint {
    fn from(decl: &EndpointDecl) -> Self {
        Self {
            table_name: decl.table_name.clone(),
            field_names: decl.field_names.clone(),
            relation_symbol: decl.relation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_dbml;

    #[test]
    fn test_type_fallback_order() {
        let structured = FieldType::Structured {
            type_name: "varchar(255)".into(),
            args: Some("255".into()),
        };
        assert_eq!(resolve_type(&structured), "varchar(255)");
        assert_eq!(resolve_type(&FieldType::Plain("money".into())), "money");
        assert_eq!(resolve_type(&FieldType::Absent), "unknown");
        assert_eq!(
            resolve_type(&FieldType::Structured {
                type_name: String::new(),
                args: None
            }),
            "unknown"
        );
        assert_eq!(resolve_type(&FieldType::Plain("  ".into())), "unknown");
    }

    #[test]
    fn test_missing_root_degrades_to_empty() {
        assert_eq!(Schema::try_from_database(None), Err(AdapterError::MissingRoot));
        assert_eq!(Schema::from_database(None), Schema::default());
        let empty = Database::default();
        assert_eq!(Schema::try_from_database(Some(&empty)), Err(AdapterError::NoSchemas));
        assert_eq!(Schema::from_database(Some(&empty)), Schema::default());
    }

    #[test]
    fn test_adapts_first_schema_only() {
        let db = parse_dbml(
            "Table users { id int note text [note: 'free form'] }\nTable auth.tokens { id int }",
        )
        .unwrap();
        let schema = Schema::from_database(Some(&db));
        assert_eq!(schema.table_names(), vec!["users"]);
        assert_eq!(schema.field_count(), 2);
        let users = schema.table("users").unwrap();
        assert_eq!(users.fields[1].declared_type, "text");
        assert_eq!(users.fields[1].note.as_deref(), Some("free form"));
    }

    #[test]
    fn test_alias_endpoints_resolve_to_table_names() {
        let db = parse_dbml(
            "Table users as U [headercolor: #24BAB1] { id int }\n\
             Table posts as P { author int }\n\
             Ref: P.author > U.id",
        )
        .unwrap();
        let schema = Schema::from_database(Some(&db));
        let r = &schema.references[0];
        assert_eq!(r.source().table_name, "posts");
        assert_eq!(r.target().table_name, "users");
        assert_eq!(schema.tables[0].header_color.as_deref(), Some("#24BAB1"));
        assert_eq!(schema.tables[1].header_color, None);
    }

    #[test]
    fn test_table_name_wins_over_alias_of_other_table() {
        let db = parse_dbml("Table a { id int }\nTable b as a { id int }\nRef: a.id - b.id").unwrap();
        let schema = Schema::from_database(Some(&db));
        assert_eq!(schema.references[0].source().table_name, "a");
        assert_eq!(schema.references[0].target().table_name, "b");
    }

    #[test]
    fn test_reference_endpoints_keep_declared_order() {
        let db = parse_dbml("Ref: a.x < b.y").unwrap();
        let schema = Schema::from_database(Some(&db));
        let r = &schema.references[0];
        assert_eq!(r.source().table_name, "a");
        assert_eq!(r.source().relation_symbol, "1");
        assert_eq!(r.target().table_name, "b");
        assert_eq!(r.target().relation_symbol, "*");
    }
}
