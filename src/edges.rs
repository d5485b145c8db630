use serde::Serialize;

use crate::ids::{container_id, field_id};
use crate::model::{Endpoint, Reference};

/// Handle ids exposed by field nodes in the renderer.
pub const SOURCE_HANDLE: &str = "source";
pub const TARGET_HANDLE: &str = "target";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEdge {
    pub id: String,
    #[serde(rename = "source")]
    pub source_node_id: String,
    #[serde(rename = "target")]
    pub target_node_id: String,
    pub source_handle: &'static str,
    pub target_handle: &'static str,
    pub start_label: String,
    pub end_label: String,
    pub animated: bool,
}

/// Node id an endpoint attaches to. Only the first field of a composite
/// endpoint is used.
pub fn endpoint_node_id(endpoint: &Endpoint) -> String {
    match endpoint.field_names.first() {
        Some(field) => field_id(&endpoint.table_name, field),
        None => container_id(&endpoint.table_name),
    }
}

/// One edge per reference, in declaration order. Endpoints are not checked
/// against the node set and duplicate ids are kept.
pub fn resolve_edges(references: &[Reference]) -> Vec<DiagramEdge> {
    references
        .iter()
        .map(|r| {
            let source = endpoint_node_id(r.source());
            let target = endpoint_node_id(r.target());
            DiagramEdge {
                id: format!("e-{}-{}", source, target),
                source_node_id: source,
                target_node_id: target,
                source_handle: SOURCE_HANDLE,
                target_handle: TARGET_HANDLE,
                start_label: r.source().relation_symbol.clone(),
                end_label: r.target().relation_symbol.clone(),
                animated: false,
            }
        })
        .collect()
}
