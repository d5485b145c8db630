use unicode_width::UnicodeWidthStr;

use crate::config::DiagramConfig;
use crate::model::Table;

pub struct TextMetrics {
    pub char_width: f64,
    pub label_padding: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self::from_config(&DiagramConfig::default())
    }
}

impl TextMetrics {
    pub fn from_config(config: &DiagramConfig) -> Self {
        Self {
            char_width: config.char_width,
            label_padding: config.label_padding,
        }
    }

    /// Display columns of `text`; wide characters count double.
    pub fn columns(text: &str) -> usize {
        UnicodeWidthStr::width(text)
    }

    pub fn text_width(&self, text: &str) -> f64 {
        Self::columns(text) as f64 * self.char_width
    }

    /// Width of the widest label in a table: its name, or any field's name
    /// and type laid side by side. Not clamped.
    pub fn table_width(&self, table: &Table) -> f64 {
        let widest_field = table
            .fields
            .iter()
            .map(|f| self.text_width(&f.name) + self.text_width(&f.declared_type))
            .fold(0.0, f64::max);
        self.text_width(&table.name).max(widest_field) + self.label_padding
    }
}
