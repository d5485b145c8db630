pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod edges;
pub mod graph;
pub mod ids;
pub mod lexer;
pub mod locate;
pub mod measure;
pub mod mermaid;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod session;
pub mod span;

use wasm_bindgen::prelude::*;

use config::DiagramConfig;
use pipeline::{Compiler, DEFAULT_THEME};

pub use diagnostic::{CompilerError, Diagnostic, Severity};
pub use locate::locate;
pub use pipeline::{compile, Compilation};
pub use session::{DocumentSession, EditorSurface};
pub use span::{Position, Span};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

/// Compile DBML source to `{ nodes, edges, diagnostics }` JSON.
///
/// Parse failures are reported in `diagnostics`; only a malformed config or
/// a serialization failure rejects.
#[wasm_bindgen(js_name = "compileSchema")]
pub fn compile_schema(
    source: &str,
    theme: Option<String>,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let config = match config_json.as_deref() {
        Some(json) => DiagramConfig::from_json(json).map_err(js_error)?,
        None => DiagramConfig::default(),
    };
    let compiler = Compiler::new(config, theme.as_deref().unwrap_or(DEFAULT_THEME));
    let compilation = compiler.compile(source);
    serde_json::to_string(&compilation).map_err(js_error)
}

/// Locate a diagram element in the source, as `{ start, end }` JSON.
#[wasm_bindgen(js_name = "locateElement")]
pub fn locate_element(source: &str, element_id: &str) -> Option<String> {
    let span = locate(source, element_id)?;
    serde_json::to_string(&span).ok()
}

/// Convert DBML source to Mermaid ER notation.
#[wasm_bindgen(js_name = "schemaToMermaid")]
pub fn schema_to_mermaid(source: &str) -> Result<String, JsValue> {
    let schema = pipeline::parse_schema(source).map_err(js_error)?;
    Ok(mermaid::to_mermaid(&schema))
}
