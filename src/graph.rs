//! Diagram nodes built from a normalized schema.
//!
//! Each table becomes a container node followed by a header node and one
//! node per field. Containers sit on one row at a fixed horizontal pitch; the
//! renderer lets the user move them afterwards, so the only guarantee here is
//! that containers do not overlap horizontally for typical widths.

use serde::Serialize;

use crate::config::DiagramConfig;
use crate::ids::{container_id, field_id, header_id};
use crate::measure::TextMetrics;
use crate::model::{Schema, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Container,
    Header,
    Field,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePayload {
    pub label: String,
    /// Opaque styling tag, passed through untouched.
    pub theme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// `headercolor` of the table, on header nodes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_color: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    pub id: String,
    pub kind: NodeKind,
    /// Canvas coordinates for containers, container-local for children.
    pub position: Point,
    pub size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub data: NodePayload,
}

impl DiagramNode {
    pub fn is_container(&self) -> bool {
        self.kind == NodeKind::Container
    }
}

pub struct DiagramBuilder {
    config: DiagramConfig,
    metrics: TextMetrics,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new(DiagramConfig::default())
    }
}

impl DiagramBuilder {
    pub fn new(config: DiagramConfig) -> Self {
        let metrics = TextMetrics::from_config(&config);
        Self { config, metrics }
    }

    pub fn build(&self, schema: &Schema, theme: &str) -> Vec<DiagramNode> {
        let mut nodes = Vec::with_capacity(schema.tables.len() * 2 + schema.field_count());
        for (index, table) in schema.tables.iter().enumerate() {
            self.push_table(&mut nodes, index, table, theme);
        }
        nodes
    }

    fn push_table(&self, nodes: &mut Vec<DiagramNode>, index: usize, table: &Table, theme: &str) {
        let cfg = &self.config;
        let parent = container_id(&table.name);

        let width = self.metrics.table_width(table);
        let height = (table.fields.len() + 1) as f64 * cfg.row_height + cfg.padding;
        // Inverted or NaN bounds degrade instead of panicking.
        let row_width = width.max(cfg.min_row_width).min(cfg.max_row_width);
        let row_size = Size {
            width: row_width,
            height: cfg.row_height,
        };

        nodes.push(DiagramNode {
            id: parent.clone(),
            kind: NodeKind::Container,
            position: Point {
                x: cfg.origin_x + index as f64 * cfg.table_pitch,
                y: cfg.origin_y,
            },
            size: Size { width, height },
            parent_id: None,
            data: NodePayload {
                label: table.name.clone(),
                theme: theme.to_string(),
                field_type: None,
                note: None,
                header_color: None,
                selected: false,
            },
        });

        nodes.push(DiagramNode {
            id: header_id(&table.name),
            kind: NodeKind::Header,
            position: Point { x: 0.0, y: 0.0 },
            size: row_size,
            parent_id: Some(parent.clone()),
            data: NodePayload {
                label: table.name.clone(),
                theme: theme.to_string(),
                field_type: None,
                note: None,
                header_color: table.header_color.clone(),
                selected: false,
            },
        });

        for (k, field) in table.fields.iter().enumerate() {
            let row = k + 1;
            nodes.push(DiagramNode {
                id: field_id(&table.name, &field.name),
                kind: NodeKind::Field,
                position: Point {
                    x: 0.0,
                    y: row as f64 * cfg.row_height,
                },
                size: row_size,
                parent_id: Some(parent.clone()),
                data: NodePayload {
                    label: field.name.clone(),
                    theme: theme.to_string(),
                    field_type: Some(field.declared_type.clone()),
                    note: field.note.clone(),
                    header_color: None,
                    selected: false,
                },
            });
        }
    }
}
