//! Map diagram element ids back to source lines.
//!
//! Lookups are line based and first-match: a table declared twice only ever
//! resolves to its first declaration, and a field is the first line in the
//! table body that starts with its name.

use crate::ids::ElementId;
use crate::span::Span;

const TABLE_KEYWORD: &str = "table ";

/// Locate `table`, `table.header` or `table.field` in `source`.
pub fn locate(source: &str, id: &str) -> Option<Span> {
    locate_element(source, &ElementId::parse(id))
}

pub fn locate_element(source: &str, element: &ElementId) -> Option<Span> {
    let lines: Vec<&str> = source.lines().collect();
    let span = match element {
        ElementId::Table(table) | ElementId::Header(table) => locate_table(&lines, table),
        ElementId::Field { table, field } => locate_field(&lines, table, field),
    };
    if span.is_none() {
        tracing::trace!(?element, "element not found in source");
    }
    span
}

/// Declaration line and opening-brace line of a table block.
struct BlockStart {
    decl: usize,
    open: usize,
}

fn find_block_start(lines: &[&str], table: &str) -> Option<BlockStart> {
    let needle = format!("{}{}", TABLE_KEYWORD, table.to_lowercase());
    let decl = lines
        .iter()
        .position(|line| line.trim().to_lowercase().starts_with(&needle))?;
    let open = (decl..lines.len()).find(|&i| lines[i].contains('{'))?;
    Some(BlockStart { decl, open })
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

fn locate_table(lines: &[&str], table: &str) -> Option<Span> {
    let start = find_block_start(lines, table)?;
    let mut depth = 0;
    for (i, line) in lines.iter().enumerate().skip(start.open) {
        depth += brace_delta(line);
        if depth <= 0 {
            return Some(Span::full_lines(lines, start.decl, i));
        }
    }
    None
}

fn locate_field(lines: &[&str], table: &str, field: &str) -> Option<Span> {
    let start = find_block_start(lines, table)?;
    let needle = field.to_lowercase();

    let mut depth = brace_delta(lines[start.open]);
    if depth <= 0 {
        return locate_field_inline(lines, start.open, &needle);
    }

    for (i, line) in lines.iter().enumerate().skip(start.open + 1) {
        depth += brace_delta(line);
        if depth <= 0 {
            return None;
        }
        if line.trim().to_lowercase().starts_with(&needle) {
            return Some(Span::full_lines(lines, i, i));
        }
    }
    None
}

/// The whole block sits on one line: look for the field as a word between
/// the braces.
fn locate_field_inline(lines: &[&str], line_idx: usize, needle: &str) -> Option<Span> {
    let line = lines[line_idx];
    let open = line.find('{')?;
    let close = line.rfind('}').filter(|&c| c > open).unwrap_or(line.len());
    let body = &line[open + 1..close];
    body.split_whitespace()
        .any(|word| word.to_lowercase() == needle)
        .then(|| Span::full_lines(lines, line_idx, line_idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    const SOURCE: &str = "\
// shop schema
Table users [headercolor: #3498DB]
{
  id int [pk]
  name varchar [note: 'display name']
}

Table posts {
  id int
  user_id int [ref: > users.id]
  Title varchar
}
";

    #[test]
    fn test_table_span_covers_block() {
        let span = locate(SOURCE, "users").unwrap();
        assert_eq!(span.start, Position::new(2, 1));
        assert_eq!(span.end, Position::new(6, 2));
    }

    #[test]
    fn test_header_redirects_to_table() {
        assert_eq!(locate(SOURCE, "posts.header"), locate(SOURCE, "posts"));
        let span = locate(SOURCE, "posts").unwrap();
        assert_eq!((span.start_line(), span.end_line()), (8, 12));
    }

    #[test]
    fn test_field_span_is_single_line() {
        let span = locate(SOURCE, "posts.user_id").unwrap();
        assert!(span.is_single_line());
        assert_eq!(span.start_line(), 10);
        assert_eq!(span.end.column, "  user_id int [ref: > users.id]".len() + 1);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(locate(SOURCE, "POSTS.title").map(|s| s.start_line()), Some(11));
        assert_eq!(locate(SOURCE, "Users").map(|s| s.start_line()), Some(2));
    }

    #[test]
    fn test_field_outside_block_is_not_found() {
        assert_eq!(locate(SOURCE, "users.user_id"), None);
        assert_eq!(locate(SOURCE, "missing"), None);
        assert_eq!(locate(SOURCE, "missing.id"), None);
    }

    #[test]
    fn test_unbalanced_block_is_not_found() {
        assert_eq!(locate("Table t { a int", "t"), None);
        assert_eq!(locate("Table t {\n  a int\n", "t"), None);
        assert_eq!(locate("Table t", "t"), None);
    }

    #[test]
    fn test_first_declaration_wins() {
        let src = "Table dup {\n  a int\n}\nTable dup {\n  b int\n}";
        assert_eq!(locate(src, "dup").map(|s| s.end_line()), Some(3));
        assert_eq!(locate(src, "dup.b"), None);
    }

    #[test]
    fn test_single_line_block() {
        let src = "Table T { f1 int f2 varchar }";
        assert_eq!(locate(src, "T").map(|s| s.start_line()), Some(1));
        assert_eq!(locate(src, "T.f2").map(|s| s.start_line()), Some(1));
        assert_eq!(locate(src, "T.f3"), None);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(locate("", "users"), None);
    }
}
