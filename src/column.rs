//! Column definitions
//!
//! A [`ColumnSpec`] is the serialisable form a host loads from YAML or JSON.
//! [`ColumnDef`] is the normalised column the grid works with; it may also
//! carry a `format` closure, which can only be attached in code.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::row::Row;
use crate::validation::Validation;

/// Custom cell formatter. Its output is inserted as raw markup.
pub type CellFormatter = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

/// How a column's values are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Currency,
    Date,
    Badge,
    Action,
    Html,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Number | ColumnType::Currency)
    }
}

/// Horizontal alignment of a column's cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
    Center,
}

impl Align {
    pub fn as_css(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Right => "right",
            Align::Center => "center",
        }
    }

    /// Default alignment for a column type
    pub fn for_type(column_type: ColumnType) -> Self {
        if column_type.is_numeric() {
            Align::Right
        } else {
            Align::Left
        }
    }
}

/// Serialisable column description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnSpec {
    pub key: String,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub column_type: Option<ColumnType>,
    pub editable: Option<bool>,
    pub align: Option<Align>,
    pub width: Option<String>,
    pub multiline: Option<bool>,
    pub validation: Option<Validation>,
    /// Badge value -> CSS colour
    pub badge: Option<HashMap<String, String>>,
}

/// A normalised column
#[derive(Clone)]
pub struct ColumnDef {
    pub key: String,
    pub label: String,
    pub column_type: ColumnType,
    pub editable: bool,
    pub align: Align,
    pub width: Option<String>,
    /// Edit with a multi-line text area instead of a single-line input
    pub multiline: bool,
    pub format: Option<CellFormatter>,
    pub validation: Option<Validation>,
    pub badge: HashMap<String, String>,
}

impl ColumnDef {
    /// A plain, read-only text column
    pub fn new(key: impl Into<String>) -> Self {
        ColumnSpec {
            key: key.into(),
            ..Default::default()
        }
        .into()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Change the type; alignment follows unless set explicitly afterwards
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self.align = Align::for_type(column_type);
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_badge(mut self, value: impl Into<String>, color: impl Into<String>) -> Self {
        self.badge.insert(value.into(), color.into());
        self
    }

    pub fn with_format<F>(mut self, format: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(format));
        self
    }

    /// Whether rendered output for this column bypasses escaping
    pub fn renders_raw(&self) -> bool {
        self.format.is_some() || matches!(self.column_type, ColumnType::Action | ColumnType::Html)
    }
}

impl From<ColumnSpec> for ColumnDef {
    fn from(spec: ColumnSpec) -> Self {
        let column_type = spec.column_type.unwrap_or_default();
        let label = spec.label.unwrap_or_else(|| spec.key.clone());
        Self {
            label,
            column_type,
            editable: spec.editable.unwrap_or(false),
            align: spec.align.unwrap_or_else(|| Align::for_type(column_type)),
            width: spec.width,
            multiline: spec.multiline.unwrap_or(false),
            format: None,
            validation: spec.validation,
            badge: spec.badge.unwrap_or_default(),
            key: spec.key,
        }
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("column_type", &self.column_type)
            .field("editable", &self.editable)
            .field("align", &self.align)
            .field("width", &self.width)
            .field("multiline", &self.multiline)
            .field("format", &self.format.as_ref().map(|_| "<fn>"))
            .field("validation", &self.validation)
            .field("badge", &self.badge)
            .finish()
    }
}

/// Parse a list of column specs from YAML (JSON is valid YAML too)
pub fn parse_columns(source: &str) -> Result<Vec<ColumnDef>, serde_yaml::Error> {
    let specs: Vec<ColumnSpec> = serde_yaml::from_str(source)?;
    Ok(specs.into_iter().map(ColumnDef::from).collect())
}
