//! Mermaid `erDiagram` export of a normalized schema.

use std::fmt::Write;

use crate::model::{Reference, Schema};

/// Serialize a Schema to Mermaid ER notation.
pub fn to_mermaid(schema: &Schema) -> String {
    let mut out = String::from("erDiagram\n");

    for table in &schema.tables {
        let _ = writeln!(out, "  {} {{", entity_name(&table.name));
        for field in &table.fields {
            let _ = writeln!(out, "    {} {}", token(&field.declared_type), token(&field.name));
        }
        out.push_str("  }\n");
    }

    for reference in &schema.references {
        write_relationship(&mut out, reference);
    }

    out
}

fn write_relationship(out: &mut String, reference: &Reference) {
    let (left, right) = (reference.source(), reference.target());
    let left_marker = if left.relation_symbol == "*" { "}o" } else { "||" };
    let right_marker = if right.relation_symbol == "*" { "o{" } else { "||" };
    let _ = writeln!(
        out,
        "  {} {}--{} {} : \"\"",
        entity_name(&left.table_name),
        left_marker,
        right_marker,
        entity_name(&right.table_name)
    );
}

/// Mermaid attribute tokens cannot contain whitespace.
fn token(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("_")
}

fn entity_name(name: &str) -> String {
    if name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        name.to_string()
    } else {
        format!("\"{}\"", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse_schema;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tables_and_relationships() {
        let schema = parse_schema(
            "Table users { id int [pk] name varchar } Table posts { id int user_id int [ref: > users.id] }",
        )
        .unwrap();
        assert_eq!(
            to_mermaid(&schema),
            "erDiagram\n\
             \x20 users {\n\
             \x20   int id\n\
             \x20   varchar name\n\
             \x20 }\n\
             \x20 posts {\n\
             \x20   int id\n\
             \x20   int user_id\n\
             \x20 }\n\
             \x20 posts }o--|| users : \"\"\n"
        );
    }

    #[test]
    fn test_unknown_and_spaced_types() {
        let schema = parse_schema("Table \"audit log\" {\n  legacy\n  at \"timestamp with time zone\"\n}").unwrap();
        let out = to_mermaid(&schema);
        assert!(out.contains("  \"audit log\" {"));
        assert!(out.contains("    unknown legacy"));
        assert!(out.contains("    timestamp_with_time_zone at"));
    }

    #[test]
    fn test_empty_schema() {
        assert_eq!(to_mermaid(&Schema::default()), "erDiagram\n");
    }
}
