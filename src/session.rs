//! Per-document selection and navigation state.

use crate::diagnostic::Diagnostic;
use crate::ids::ElementId;
use crate::locate::locate_element;
use crate::pipeline::{Compilation, Compiler};
use crate::span::{Position, Span};

/// The text editor hosting the document.
pub trait EditorSurface {
    fn reveal_span(&mut self, span: &Span);
    fn select_span(&mut self, span: &Span);
    fn set_cursor(&mut self, position: Position);
}

/// State for one open document. Compilation itself is stateless; the
/// selected table is the only thing carried between passes.
#[derive(Debug, Clone, Default)]
pub struct DocumentSession {
    selected_table: Option<String>,
    table_names: Vec<String>,
    diagnostics: Option<Vec<Diagnostic>>,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_table(&self) -> Option<&str> {
        self.selected_table.as_deref()
    }

    /// Diagnostics of the last pass; `None` until the first compilation.
    pub fn diagnostics(&self) -> Option<&[Diagnostic]> {
        self.diagnostics.as_deref()
    }

    /// Run a compilation pass and apply this session's selection to it.
    pub fn recompile(&mut self, compiler: &Compiler, source: &str) -> Compilation {
        let mut compilation = compiler.compile(source);
        if compilation.is_ok() {
            self.sync_tables(&compilation);
        }
        self.diagnostics = Some(compilation.diagnostics.clone());
        self.decorate(&mut compilation);
        compilation
    }

    /// Drop the selection when the compiled table set is not the one it was
    /// made against.
    pub fn sync_tables(&mut self, compilation: &Compilation) {
        let names: Vec<String> = compilation
            .nodes
            .iter()
            .filter(|n| n.is_container())
            .map(|n| n.data.label.clone())
            .collect();
        if names != self.table_names {
            if let Some(prev) = self.selected_table.as_deref() {
                tracing::debug!(table = %prev, "table set changed, selection cleared");
            }
            self.clear_selection();
            self.table_names = names;
        }
    }

    /// Read an activation id. Node ids come first; a bare table name is
    /// accepted when the container reading names no compiled table.
    fn resolve(&self, element_id: &str) -> ElementId {
        let element = ElementId::from_node_id(element_id);
        let known = |name: &str| self.table_names.iter().any(|t| t == name);
        if let ElementId::Table(t) = &element {
            if !known(t) && known(element_id) {
                return ElementId::Table(element_id.to_string());
            }
        }
        element
    }

    /// Single activation: select the owning table of the element.
    pub fn activate(&mut self, element_id: &str) {
        let table = self.resolve(element_id).table_name().to_string();
        self.selected_table = Some(table);
    }

    pub fn clear_selection(&mut self) {
        self.selected_table = None;
    }

    /// Double activation: reveal and select the element's source. Does
    /// nothing when the element cannot be located.
    pub fn double_activate<E: EditorSurface + ?Sized>(
        &self,
        source: &str,
        element_id: &str,
        editor: &mut E,
    ) -> Option<Span> {
        let span = locate_element(source, &self.resolve(element_id))?;
        editor.reveal_span(&span);
        editor.select_span(&span);
        Some(span)
    }

    /// Jump to a diagnostic's own location.
    pub fn activate_diagnostic<E: EditorSurface + ?Sized>(&self, diagnostic: &Diagnostic, editor: &mut E) {
        let at = Span::new(diagnostic.location, diagnostic.location);
        editor.reveal_span(&at);
        editor.set_cursor(diagnostic.location);
    }

    /// Mark the selected table's container and every edge touching it.
    pub fn decorate(&self, compilation: &mut Compilation) {
        let selected = self.selected_table.as_deref();
        let owned_by_selected = |id: &str| selected == Some(ElementId::from_node_id(id).table_name());

        for node in &mut compilation.nodes {
            node.data.selected = node.is_container() && owned_by_selected(node.id.as_str());
        }
        for edge in &mut compilation.edges {
            edge.animated = owned_by_selected(edge.source_node_id.as_str())
                || owned_by_selected(edge.target_node_id.as_str());
        }
    }
}
