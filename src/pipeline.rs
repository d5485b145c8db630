use serde::Serialize;

use crate::config::DiagramConfig;
use crate::diagnostic::{normalize, CompilerError, Diagnostic};
use crate::edges::{resolve_edges, DiagramEdge};
use crate::graph::{DiagramBuilder, DiagramNode};
use crate::model::Schema;
use crate::parser::parse_dbml;

pub const DEFAULT_THEME: &str = "light";

/// Result of one compilation pass. On failure `nodes` and `edges` are empty
/// and `diagnostics` holds at least one entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Compilation {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            diagnostics,
        }
    }
}

/// Parse and adapt `source` to the normalized schema.
pub fn parse_schema(source: &str) -> Result<Schema, CompilerError> {
    let db = parse_dbml(source)?;
    Ok(Schema::from_database(Some(&db)))
}

pub struct Compiler {
    builder: DiagramBuilder,
    theme: String,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(DiagramConfig::default(), DEFAULT_THEME)
    }
}

impl Compiler {
    pub fn new(config: DiagramConfig, theme: impl Into<String>) -> Self {
        Self {
            builder: DiagramBuilder::new(config),
            theme: theme.into(),
        }
    }

    /// Compile source text to diagram nodes, edges and diagnostics.
    /// Blank input compiles to an empty diagram without diagnostics.
    pub fn compile(&self, source: &str) -> Compilation {
        if source.trim().is_empty() {
            return Compilation::default();
        }

        let schema = match parse_schema(source) {
            Ok(schema) => schema,
            Err(err) => {
                let diagnostics = normalize(&err);
                tracing::debug!(count = diagnostics.len(), "compilation failed");
                return Compilation::failed(diagnostics);
            }
        };

        self.compile_schema(&schema)
    }

    pub fn compile_schema(&self, schema: &Schema) -> Compilation {
        let nodes = self.builder.build(schema, &self.theme);
        let edges = resolve_edges(&schema.references);
        tracing::debug!(
            tables = schema.tables.len(),
            nodes = nodes.len(),
            edges = edges.len(),
            "compiled diagram"
        );
        Compilation {
            nodes,
            edges,
            diagnostics: Vec::new(),
        }
    }
}

/// Compile with the default layout and theme.
pub fn compile(source: &str) -> Compilation {
    Compiler::default().compile(source)
}
