use crate::ast::*;
use crate::diagnostic::{CompilerError, ErrorCode};
use crate::lexer::{LexError, Lexer, Spanned, Token};
use crate::span::Position;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("Unexpected {found}, expected {expected}")]
    Unexpected {
        found: Token,
        expected: &'static str,
        pos: Position,
    },
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        expected: &'static str,
        pos: Position,
    },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position(),
            ParseError::Unexpected { pos, .. } | ParseError::UnexpectedEof { pos, .. } => *pos,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::Lex(LexError::UnexpectedChar { .. }) => ErrorCode::UnexpectedCharacter,
            ParseError::Lex(LexError::UnterminatedString { .. }) => ErrorCode::UnterminatedString,
            ParseError::Lex(LexError::UnterminatedComment { .. }) => ErrorCode::UnterminatedComment,
            ParseError::Unexpected { .. } => ErrorCode::UnexpectedToken,
            ParseError::UnexpectedEof { .. } => ErrorCode::UnexpectedEof,
        }
    }
}

/// Parse DBML source, reporting failure as structured diagnostics.
pub fn parse_dbml(source: &str) -> Result<Database, CompilerError> {
    let mut parser = Parser::new(source)?;
    Ok(parser.parse()?)
}

/// A `key[: value]` entry from a `[...]` settings list.
#[derive(Debug, Clone, PartialEq)]
struct Setting {
    key: String,
    value: Option<SettingValue>,
}

#[derive(Debug, Clone, PartialEq)]
enum SettingValue {
    Text(String),
    Ref(RelationOp, EndpointPath),
}

#[derive(Debug, Clone, PartialEq)]
struct EndpointPath {
    schema_name: Option<String>,
    table_name: String,
    field_names: Vec<String>,
}

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    tables: Vec<TableDecl>,
    refs: Vec<RefDecl>,
    enums: Vec<(Option<String>, EnumDecl)>,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self {
            tokens,
            pos: 0,
            tables: Vec::new(),
            refs: Vec::new(),
            enums: Vec::new(),
        })
    }

    fn current(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos).or_else(|| self.tokens.last())
    }

    fn peek(&self) -> &Token {
        self.current().map_or(&Token::Eof, |t| &t.token)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.pos + offset)
            .map_or(&Token::Eof, |t| &t.token)
    }

    fn position(&self) -> Position {
        self.current().map_or(Position::START, |t| t.pos)
    }

    fn advance(&mut self) -> Spanned {
        let tok = self.current().cloned().unwrap_or(Spanned {
            token: Token::Eof,
            pos: Position::START,
        });
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            Token::Eof => ParseError::UnexpectedEof {
                expected,
                pos: self.position(),
            },
            tok => ParseError::Unexpected {
                found: tok.clone(),
                expected,
                pos: self.position(),
            },
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        if *self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(what))
        }
    }

    /// An identifier or a double-quoted name.
    fn expect_name(&mut self, what: &'static str) -> Result<String, ParseError> {
        match self.peek().clone() {
            Token::Ident(s) | Token::Quoted(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.error(what)),
        }
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Token::Ident(s) if s.eq_ignore_ascii_case(keyword))
    }

    fn is_name(&self) -> bool {
        matches!(self.peek(), Token::Ident(_) | Token::Quoted(_))
    }

    pub fn parse(&mut self) -> Result<Database, ParseError> {
        while *self.peek() != Token::Eof {
            if self.check_keyword("table") {
                self.advance();
                let table = self.parse_table()?;
                self.tables.push(table);
            } else if self.check_keyword("ref") {
                self.advance();
                self.parse_ref()?;
            } else if self.check_keyword("enum") {
                self.advance();
                let decl = self.parse_enum()?;
                self.enums.push(decl);
            } else if self.check_keyword("project")
                || self.check_keyword("tablegroup")
                || self.check_keyword("note")
            {
                self.advance();
                self.skip_named_block()?;
            } else {
                return Err(self.error("Table, Ref, Enum, Project, TableGroup or Note"));
            }
        }

        Ok(self.finish())
    }

    /// Group everything parsed so far into schemas, `public` first.
    fn finish(&mut self) -> Database {
        let mut schemas = vec![SchemaDecl::new(DEFAULT_SCHEMA)];

        fn schema_index(schemas: &mut Vec<SchemaDecl>, name: Option<&str>) -> usize {
            let name = name.unwrap_or(DEFAULT_SCHEMA);
            match schemas.iter().position(|s| s.name == name) {
                Some(idx) => idx,
                None => {
                    schemas.push(SchemaDecl::new(name));
                    schemas.len() - 1
                }
            }
        }

        for table in self.tables.drain(..) {
            let idx = schema_index(&mut schemas, table.schema_name.as_deref());
            schemas[idx].tables.push(table);
        }
        for decl in self.refs.drain(..) {
            let idx = schema_index(&mut schemas, decl.endpoints[0].schema_name.as_deref());
            schemas[idx].refs.push(decl);
        }
        for (schema_name, decl) in self.enums.drain(..) {
            let idx = schema_index(&mut schemas, schema_name.as_deref());
            schemas[idx].enums.push(decl);
        }

        Database { schemas }
    }

    /// `name` or `schema.name`.
    fn parse_qualified_name(&mut self, what: &'static str) -> Result<(Option<String>, String), ParseError> {
        let first = self.expect_name(what)?;
        if *self.peek() == Token::Dot {
            self.advance();
            let second = self.expect_name(what)?;
            Ok((Some(first), second))
        } else {
            Ok((None, first))
        }
    }

    fn parse_table(&mut self) -> Result<TableDecl, ParseError> {
        let (schema_name, name) = self.parse_qualified_name("table name")?;

        let mut alias = None;
        if self.check_keyword("as") {
            self.advance();
            alias = Some(self.expect_name("table alias")?);
        }

        let mut header_color = None;
        let mut note = None;
        if *self.peek() == Token::LBracket {
            for setting in self.parse_settings()? {
                match (setting.key.as_str(), setting.value) {
                    ("headercolor", Some(SettingValue::Text(v))) => header_color = Some(v),
                    ("note", Some(SettingValue::Text(v))) => note = Some(v),
                    _ => {}
                }
            }
        }

        self.expect(Token::LBrace, "'{' to open the table body")?;

        let mut fields = Vec::new();
        while *self.peek() != Token::RBrace {
            if *self.peek() == Token::Eof {
                return Err(self.error("'}' to close the table body"));
            }
            if self.check_keyword("note") && matches!(self.peek_at(1), Token::Colon | Token::LBrace) {
                self.advance();
                note = Some(self.parse_note_value()?);
            } else if self.check_keyword("indexes") && *self.peek_at(1) == Token::LBrace {
                self.advance();
                self.skip_block()?;
            } else {
                let field = self.parse_field(&schema_name, &name)?;
                fields.push(field);
            }
        }

        self.expect(Token::RBrace, "'}'")?;

        Ok(TableDecl {
            name,
            schema_name,
            alias,
            header_color,
            note,
            fields,
        })
    }

    /// `Note: '...'` or `Note { '...' }`, keyword already consumed.
    fn parse_note_value(&mut self) -> Result<String, ParseError> {
        if *self.peek() == Token::Colon {
            self.advance();
            return self.expect_string("note text");
        }
        self.expect(Token::LBrace, "':' or '{'")?;
        let text = self.expect_string("note text")?;
        self.expect(Token::RBrace, "'}' to close the note")?;
        Ok(text)
    }

    fn expect_string(&mut self, what: &'static str) -> Result<String, ParseError> {
        match self.peek().clone() {
            Token::Str(s) | Token::Quoted(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.error(what)),
        }
    }

    fn parse_field(&mut self, schema_name: &Option<String>, table: &str) -> Result<FieldDecl, ParseError> {
        let name_tok = self.advance();
        let pos = name_tok.pos;
        let name = match name_tok.token {
            Token::Ident(s) | Token::Quoted(s) => s,
            found => {
                return Err(ParseError::Unexpected {
                    found,
                    expected: "field name",
                    pos,
                });
            }
        };

        let field_type = self.parse_field_type(pos.line)?;

        let mut field = FieldDecl {
            name,
            field_type,
            pk: false,
            unique: false,
            not_null: false,
            increment: false,
            default: None,
            note: None,
        };

        if *self.peek() == Token::LBracket {
            for setting in self.parse_settings()? {
                match (setting.key.as_str(), setting.value) {
                    ("pk" | "primary key", _) => field.pk = true,
                    ("unique", _) => field.unique = true,
                    ("not null", _) => field.not_null = true,
                    ("null", _) => field.not_null = false,
                    ("increment", _) => field.increment = true,
                    ("default", Some(SettingValue::Text(v))) => field.default = Some(v),
                    ("note", Some(SettingValue::Text(v))) => field.note = Some(v),
                    ("ref", Some(SettingValue::Ref(op, target))) => {
                        let (left, right) = op.symbols();
                        self.refs.push(RefDecl {
                            name: None,
                            endpoints: [
                                EndpointDecl {
                                    schema_name: schema_name.clone(),
                                    table_name: table.to_string(),
                                    field_names: vec![field.name.clone()],
                                    relation: left.to_string(),
                                },
                                EndpointDecl {
                                    schema_name: target.schema_name,
                                    table_name: target.table_name,
                                    field_names: target.field_names,
                                    relation: right.to_string(),
                                },
                            ],
                        });
                    }
                    _ => {}
                }
            }
        }

        Ok(field)
    }

    /// The type only counts when it starts on the same line as the field name.
    fn parse_field_type(&mut self, line: usize) -> Result<FieldType, ParseError> {
        if self.position().line != line {
            return Ok(FieldType::Absent);
        }
        match self.peek().clone() {
            Token::Quoted(s) => {
                self.advance();
                Ok(FieldType::Plain(s))
            }
            Token::Ident(s) => {
                self.advance();
                let mut type_name = s;
                if *self.peek() == Token::Dot {
                    self.advance();
                    type_name.push('.');
                    type_name.push_str(&self.expect_name("type name")?);
                }
                let mut args = None;
                if *self.peek() == Token::LParen {
                    self.advance();
                    let raw = self.collect_until(&Token::RParen, "')' to close type arguments")?;
                    type_name.push('(');
                    type_name.push_str(&raw);
                    type_name.push(')');
                    args = Some(raw);
                }
                if *self.peek() == Token::LBracket && *self.peek_at(1) == Token::RBracket {
                    self.advance();
                    self.advance();
                    type_name.push_str("[]");
                }
                Ok(FieldType::Structured { type_name, args })
            }
            _ => Ok(FieldType::Absent),
        }
    }

    /// Render tokens up to (and consuming) `end` back to text.
    fn collect_until(&mut self, end: &Token, what: &'static str) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            match self.peek().clone() {
                Token::Eof => return Err(self.error(what)),
                tok if tok == *end => {
                    self.advance();
                    return Ok(out);
                }
                Token::Comma => {
                    self.advance();
                    out.push(',');
                }
                Token::Ident(s) | Token::Num(s) => {
                    self.advance();
                    if out.ends_with(|c: char| c.is_alphanumeric()) {
                        out.push(' ');
                    }
                    out.push_str(&s);
                }
                Token::Str(s) => {
                    self.advance();
                    out.push('\'');
                    out.push_str(&s);
                    out.push('\'');
                }
                _ => {
                    return Err(self.error(what));
                }
            }
        }
    }

    fn parse_settings(&mut self) -> Result<Vec<Setting>, ParseError> {
        self.expect(Token::LBracket, "'['")?;
        let mut settings = Vec::new();

        while *self.peek() != Token::RBracket {
            let mut words = Vec::new();
            while let Token::Ident(w) = self.peek().clone() {
                self.advance();
                words.push(w.to_lowercase());
            }
            if words.is_empty() {
                return Err(self.error("setting name"));
            }
            let key = words.join(" ");

            let value = if *self.peek() == Token::Colon {
                self.advance();
                if key == "ref" {
                    let op = self.parse_relation_op()?;
                    let target = self.parse_endpoint_path()?;
                    Some(SettingValue::Ref(op, target))
                } else {
                    Some(SettingValue::Text(self.parse_setting_value()?))
                }
            } else {
                None
            };
            settings.push(Setting { key, value });

            match self.peek() {
                Token::Comma => {
                    self.advance();
                }
                Token::RBracket => {}
                _ => return Err(self.error("',' or ']'")),
            }
        }

        self.expect(Token::RBracket, "']'")?;
        Ok(settings)
    }

    fn parse_setting_value(&mut self) -> Result<String, ParseError> {
        match self.peek().clone() {
            Token::Str(s) | Token::Quoted(s) | Token::Expr(s) | Token::Num(s) | Token::Color(s) => {
                self.advance();
                Ok(s)
            }
            Token::Dash => {
                self.advance();
                match self.peek().clone() {
                    Token::Num(n) => {
                        self.advance();
                        Ok(format!("-{}", n))
                    }
                    _ => Err(self.error("number after '-'")),
                }
            }
            Token::Ident(first) => {
                self.advance();
                let mut words = vec![first];
                while let Token::Ident(w) = self.peek().clone() {
                    self.advance();
                    words.push(w);
                }
                Ok(words.join(" "))
            }
            _ => Err(self.error("setting value")),
        }
    }

    fn parse_relation_op(&mut self) -> Result<RelationOp, ParseError> {
        let op = match self.peek() {
            Token::Gt => RelationOp::ManyToOne,
            Token::Lt => RelationOp::OneToMany,
            Token::Dash => RelationOp::OneToOne,
            Token::LtGt => RelationOp::ManyToMany,
            _ => return Err(self.error("relation ('>', '<', '-' or '<>')")),
        };
        self.advance();
        Ok(op)
    }

    /// `table`, `table.field`, `schema.table.field` or `table.(a, b)`.
    fn parse_endpoint_path(&mut self) -> Result<EndpointPath, ParseError> {
        let mut segments = vec![self.expect_name("table name")?];
        let mut composite = None;

        while *self.peek() == Token::Dot {
            self.advance();
            if *self.peek() == Token::LParen {
                self.advance();
                let mut names = vec![self.expect_name("field name")?];
                while *self.peek() == Token::Comma {
                    self.advance();
                    names.push(self.expect_name("field name")?);
                }
                self.expect(Token::RParen, "')' to close the field list")?;
                composite = Some(names);
                break;
            }
            segments.push(self.expect_name("name")?);
        }

        let path = match composite {
            Some(field_names) => {
                let table_name = segments.pop().unwrap_or_default();
                EndpointPath {
                    schema_name: segments.pop(),
                    table_name,
                    field_names,
                }
            }
            None if segments.len() == 1 => EndpointPath {
                schema_name: None,
                table_name: segments.remove(0),
                field_names: Vec::new(),
            },
            None => {
                let field = segments.pop().unwrap_or_default();
                let table_name = segments.pop().unwrap_or_default();
                EndpointPath {
                    schema_name: segments.pop(),
                    table_name,
                    field_names: vec![field],
                }
            }
        };
        Ok(path)
    }

    fn parse_ref(&mut self) -> Result<(), ParseError> {
        let name = if self.is_name() {
            Some(self.expect_name("ref name")?)
        } else {
            None
        };

        match self.peek() {
            Token::Colon => {
                self.advance();
                self.parse_ref_line(name)?;
            }
            Token::LBrace => {
                self.advance();
                while *self.peek() != Token::RBrace {
                    if *self.peek() == Token::Eof {
                        return Err(self.error("'}' to close the ref block"));
                    }
                    self.parse_ref_line(name.clone())?;
                }
                self.advance();
            }
            _ => return Err(self.error("':' or '{' after Ref")),
        }
        Ok(())
    }

    fn parse_ref_line(&mut self, name: Option<String>) -> Result<(), ParseError> {
        let left = self.parse_endpoint_path()?;
        let op = self.parse_relation_op()?;
        let right = self.parse_endpoint_path()?;

        // Referential actions (`delete:`, `update:`) have no diagram form.
        if *self.peek() == Token::LBracket {
            self.parse_settings()?;
        }

        let (left_rel, right_rel) = op.symbols();
        self.refs.push(RefDecl {
            name,
            endpoints: [
                EndpointDecl {
                    schema_name: left.schema_name,
                    table_name: left.table_name,
                    field_names: left.field_names,
                    relation: left_rel.to_string(),
                },
                EndpointDecl {
                    schema_name: right.schema_name,
                    table_name: right.table_name,
                    field_names: right.field_names,
                    relation: right_rel.to_string(),
                },
            ],
        });
        Ok(())
    }

    fn parse_enum(&mut self) -> Result<(Option<String>, EnumDecl), ParseError> {
        let (schema_name, name) = self.parse_qualified_name("enum name")?;
        self.expect(Token::LBrace, "'{' to open the enum body")?;

        let mut values = Vec::new();
        while *self.peek() != Token::RBrace {
            values.push(self.expect_name("enum value")?);
            if *self.peek() == Token::LBracket {
                self.parse_settings()?;
            }
        }
        self.advance();

        Ok((schema_name, EnumDecl { name, values }))
    }

    /// Skip `[name] [settings] { ... }` for blocks that do not affect the diagram.
    fn skip_named_block(&mut self) -> Result<(), ParseError> {
        while *self.peek() != Token::LBrace {
            match self.peek() {
                Token::Eof => return Err(self.error("'{'")),
                Token::LBracket => {
                    self.parse_settings()?;
                }
                _ => {
                    self.advance();
                }
            }
        }
        self.skip_block()
    }

    fn skip_block(&mut self) -> Result<(), ParseError> {
        self.expect(Token::LBrace, "'{'")?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance().token {
                Token::LBrace => depth += 1,
                Token::RBrace => depth -= 1,
                Token::Eof => {
                    return Err(ParseError::UnexpectedEof {
                        expected: "'}'",
                        pos: self.position(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public(input: &str) -> SchemaDecl {
        let mut db = parse_dbml(input).unwrap();
        db.schemas.remove(0)
    }

    #[test]
    fn test_parse_table() {
        let schema = public(
            r#"
            Table users {
                id int [pk, increment]
                name varchar(255) [not null, note: 'display name']
                email varchar [unique]
            }
            "#,
        );
        assert_eq!(schema.tables.len(), 1);
        let users = &schema.tables[0];
        assert_eq!(users.name, "users");
        assert_eq!(users.fields.len(), 3);
        assert!(users.fields[0].pk && users.fields[0].increment);
        assert_eq!(
            users.fields[1].field_type,
            FieldType::Structured {
                type_name: "varchar(255)".into(),
                args: Some("255".into())
            }
        );
        assert_eq!(users.fields[1].note.as_deref(), Some("display name"));
        assert!(users.fields[2].unique);
    }

    #[test]
    fn test_single_line_tables_and_inline_ref() {
        let schema = public(
            "Table users { id int [pk] name varchar } Table posts { id int user_id int [ref: > users.id] }",
        );
        assert_eq!(schema.tables.len(), 2);
        assert_eq!(schema.tables[1].fields.len(), 2);
        assert_eq!(schema.refs.len(), 1);
        let [from, to] = &schema.refs[0].endpoints;
        assert_eq!(from.table_name, "posts");
        assert_eq!(from.field_names, vec!["user_id"]);
        assert_eq!(from.relation, "*");
        assert_eq!(to.table_name, "users");
        assert_eq!(to.field_names, vec!["id"]);
        assert_eq!(to.relation, "1");
    }

    #[test]
    fn test_type_on_next_line_is_absent() {
        let schema = public("Table t {\n  legacy\n  other text\n  flag [note: 'x']\n}");
        let fields = &schema.tables[0].fields;
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].field_type, FieldType::Absent);
        assert!(matches!(fields[1].field_type, FieldType::Structured { .. }));
        assert_eq!(fields[2].field_type, FieldType::Absent);
    }

    #[test]
    fn test_digit_leading_field_name() {
        let schema = public("Table t {\n  2fa_enabled bool\n}\nRef: t.2fa_enabled - t.2fa_enabled");
        assert_eq!(schema.tables[0].fields[0].name, "2fa_enabled");
        assert_eq!(schema.refs[0].endpoints[0].field_names, vec!["2fa_enabled"]);
    }

    #[test]
    fn test_quoted_type_is_plain() {
        let schema = public("Table t {\n  at \"timestamp with time zone\"\n}");
        assert_eq!(
            schema.tables[0].fields[0].field_type,
            FieldType::Plain("timestamp with time zone".into())
        );
    }

    #[test]
    fn test_parse_ref_forms() {
        let schema = public(
            r#"
            Ref: posts.user_id > users.id [delete: cascade, update: no action]
            Ref author {
                comments.user_id > users.id
                users.id - profiles.user_id
            }
            Ref: orders.(a, b) <> items.(c, d)
            "#,
        );
        assert_eq!(schema.refs.len(), 4);
        assert_eq!(schema.refs[0].endpoints[1].table_name, "users");
        assert_eq!(schema.refs[1].name.as_deref(), Some("author"));
        assert_eq!(schema.refs[2].endpoints[0].relation, "1");
        assert_eq!(schema.refs[2].endpoints[1].relation, "1");
        assert_eq!(schema.refs[3].endpoints[0].field_names, vec!["a", "b"]);
        assert_eq!(schema.refs[3].endpoints[1].relation, "*");
    }

    #[test]
    fn test_table_settings_note_and_indexes() {
        let schema = public(
            r#"
            Table orders as O [headercolor: #3498DB, note: 'orders table'] {
                id int [pk]
                status order_status [default: 'new']
                total decimal(10,2) [default: -1]
                indexes {
                    (id, status) [unique]
                }
                Note: 'overridden'
            }
            "#,
        );
        let orders = &schema.tables[0];
        assert_eq!(orders.alias.as_deref(), Some("O"));
        assert_eq!(orders.header_color.as_deref(), Some("#3498DB"));
        assert_eq!(orders.note.as_deref(), Some("overridden"));
        assert_eq!(orders.fields.len(), 3);
        assert_eq!(orders.fields[1].default.as_deref(), Some("new"));
        assert_eq!(orders.fields[2].default.as_deref(), Some("-1"));
    }

    #[test]
    fn test_other_blocks_are_skipped() {
        let schema = public(
            r#"
            Project shop { database_type: 'PostgreSQL' Note: 'x' }
            Enum order_status { new shipped [note: 'left the building'] }
            TableGroup core { users posts }
            Note intro { 'hello' }
            Table users { id int }
            "#,
        );
        assert_eq!(schema.tables.len(), 1);
        assert_eq!(schema.enums[0].values, vec!["new", "shipped"]);
    }

    #[test]
    fn test_schema_qualified_tables_are_grouped() {
        let db = parse_dbml("Table users { id int }\nTable auth.sessions { id int }").unwrap();
        assert_eq!(db.schemas.len(), 2);
        assert_eq!(db.schemas[0].name, "public");
        assert_eq!(db.schemas[0].tables.len(), 1);
        assert_eq!(db.schemas[1].name, "auth");
        assert_eq!(db.schemas[1].tables[0].name, "sessions");
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let schema = public("TABLE a { x int }\ntable b { y int }");
        assert_eq!(schema.tables.len(), 2);
    }

    #[test]
    fn test_error_reports_position() {
        let err = parse_dbml("Table users {\n  id int\n").unwrap_err();
        assert_eq!(err.diags.len(), 1);
        assert_eq!(err.diags[0].code, 3002);
        assert_eq!(err.diags[0].location, Position::new(3, 1));

        let err = parse_dbml("Tabel users {}").unwrap_err();
        assert_eq!(err.diags[0].code, 3001);
        assert_eq!(err.diags[0].location, Position::new(1, 1));
    }

    #[test]
    fn test_lex_error_becomes_diagnostic() {
        let err = parse_dbml("Table a {\n  b int;\n}").unwrap_err();
        assert_eq!(err.diags[0].code, 1002);
        assert_eq!(err.diags[0].location, Position::new(2, 8));
    }
}
