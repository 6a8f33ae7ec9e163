//! Declarative label-pattern table.
//!
//! The table that drives extraction lives in `fields/dashboard.toml` and is
//! baked into the binary with [`include_str!`]. Adding a label variant is a
//! matter of appending a pattern to that file. Other tables can be loaded
//! with [`FieldTable::from_toml`] or [`FieldTable::from_path`].

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use project_dashboard_models::{DashboardField, FieldKind, FieldValue};
use regex::Regex;
use serde::Deserialize;

use crate::DashboardError;
use crate::extract::{compile_pattern, extract};

/// Field table embedded at compile time.
const DASHBOARD_FIELDS_TOML: &str = include_str!("../fields/dashboard.toml");

static BUILTIN: LazyLock<FieldTable> = LazyLock::new(|| {
    FieldTable::from_toml(DASHBOARD_FIELDS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded dashboard.toml: {e}"))
});

// ── TOML shape ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldTableDef {
    fields: Vec<FieldDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDef {
    name: DashboardField,
    kind: FieldKind,
    patterns: Vec<String>,
}

// ── Compiled table ───────────────────────────────────────────────────────

/// One record field and the patterns that locate it.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    field: DashboardField,
    kind: FieldKind,
    patterns: Vec<Regex>,
}

impl FieldSpec {
    #[must_use]
    pub const fn field(&self) -> DashboardField {
        self.field
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Tries each pattern in order and returns the first non-default value,
    /// or the kind's default if none produces one.
    #[must_use]
    pub fn extract(&self, text: &str) -> FieldValue {
        self.patterns
            .iter()
            .map(|re| extract(self.kind, text, re))
            .find(|value| !value.is_default())
            .unwrap_or_else(|| FieldValue::default_for(self.kind))
    }
}

/// A validated, compiled set of [`FieldSpec`]s covering every
/// [`DashboardField`] exactly once.
#[derive(Debug, Clone)]
pub struct FieldTable {
    fields: Vec<FieldSpec>,
}

impl FieldTable {
    /// The table embedded in the binary.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. It is a compile-time
    /// constant, so this is caught by the crate's tests.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Parses and validates a table from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::FieldTable`] if the TOML is malformed, a
    /// field is declared with the wrong kind, missing, or repeated, or a
    /// pattern fails to compile or does not have exactly one capture group.
    pub fn from_toml(toml_str: &str) -> Result<Self, DashboardError> {
        let def: FieldTableDef =
            toml::de::from_str(toml_str).map_err(|e| DashboardError::FieldTable {
                message: e.to_string(),
            })?;

        let mut seen = BTreeSet::new();
        let mut fields = Vec::with_capacity(def.fields.len());

        for field_def in def.fields {
            let field = field_def.name;

            if !seen.insert(field) {
                return Err(table_error(format!("field '{field}' is declared twice")));
            }
            if field_def.kind != field.kind() {
                return Err(table_error(format!(
                    "field '{field}' must be of kind '{}', not '{}'",
                    field.kind(),
                    field_def.kind
                )));
            }
            if field_def.patterns.is_empty() {
                return Err(table_error(format!("field '{field}' has no patterns")));
            }

            let patterns = field_def
                .patterns
                .iter()
                .map(|pattern| compile_field_pattern(field, field_def.kind, pattern))
                .collect::<Result<Vec<_>, _>>()?;

            fields.push(FieldSpec {
                field,
                kind: field_def.kind,
                patterns,
            });
        }

        let missing: Vec<String> = DashboardField::ALL
            .iter()
            .filter(|f| !seen.contains(*f))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(table_error(format!(
                "missing field(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self { fields })
    }

    /// Reads and validates a table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Io`] if the file cannot be read, or any
    /// error from [`Self::from_toml`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let toml_str = std::fs::read_to_string(path)?;
        log::debug!("Loading dashboard field table from {}", path.display());
        Self::from_toml(&toml_str).map_err(|e| match e {
            DashboardError::FieldTable { message } => DashboardError::FieldTable {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })
    }

    /// Field specs in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up the spec for `field`.
    #[must_use]
    pub fn get(&self, field: DashboardField) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.field == field)
    }
}

fn compile_field_pattern(
    field: DashboardField,
    kind: FieldKind,
    pattern: &str,
) -> Result<Regex, DashboardError> {
    let re = compile_pattern(kind, pattern)
        .map_err(|e| table_error(format!("invalid pattern for '{field}': {e}")))?;

    // Group 0 is the whole match.
    if re.captures_len() != 2 {
        return Err(table_error(format!(
            "pattern for '{field}' must have exactly one capture group: {pattern}"
        )));
    }

    Ok(re)
}

const fn table_error(message: String) -> DashboardError {
    DashboardError::FieldTable { message }
}
