#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard record types shared by the parser and the CLI.
//!
//! A single parse produces exactly one [`OutputEnvelope`]: either a fully
//! populated [`DashboardRecord`] or an [`ErrorRecord`]. The JSON shape of
//! both is what downstream consumers read from stdout, so field names and
//! their order are part of the contract.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How a captured value is coerced into a record field.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    /// Currency amount with optional comma separators, rounded to an integer.
    Number,
    /// Percentage scaled by 100 (`31.00%` becomes `3100`).
    Percentage,
    /// Free text, trimmed.
    Text,
}

/// The eleven fields of a [`DashboardRecord`], in output order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DashboardField {
    ProjectName,
    ProjectCode,
    ClientName,
    ProjectManager,
    ContractValue,
    BaselineBudget,
    #[serde(rename = "baselineGPM")]
    #[strum(serialize = "baselineGPM")]
    BaselineGpm,
    WorkingBudget,
    #[serde(rename = "currentGPM")]
    #[strum(serialize = "currentGPM")]
    CurrentGpm,
    ActualCosts,
    ProjectProgress,
}

impl DashboardField {
    /// Every field, in the order it appears in the serialized record.
    pub const ALL: &[Self] = &[
        Self::ProjectName,
        Self::ProjectCode,
        Self::ClientName,
        Self::ProjectManager,
        Self::ContractValue,
        Self::BaselineBudget,
        Self::BaselineGpm,
        Self::WorkingBudget,
        Self::CurrentGpm,
        Self::ActualCosts,
        Self::ProjectProgress,
    ];

    /// The coercion this field's value goes through.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::ProjectName | Self::ProjectCode | Self::ClientName | Self::ProjectManager => {
                FieldKind::Text
            }
            Self::ContractValue
            | Self::BaselineBudget
            | Self::WorkingBudget
            | Self::ActualCosts => FieldKind::Number,
            Self::BaselineGpm | Self::CurrentGpm | Self::ProjectProgress => FieldKind::Percentage,
        }
    }
}

/// A coerced field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Output of [`FieldKind::Number`] and [`FieldKind::Percentage`].
    Integer(i64),
    /// Output of [`FieldKind::Text`].
    Text(String),
}

impl FieldValue {
    /// The value a field takes when nothing usable was found.
    #[must_use]
    pub const fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Number | FieldKind::Percentage => Self::Integer(0),
            FieldKind::Text => Self::Text(String::new()),
        }
    }

    /// Whether this is `0` or the empty string.
    #[must_use]
    pub fn is_default(&self) -> bool {
        match self {
            Self::Integer(n) => *n == 0,
            Self::Text(s) => s.is_empty(),
        }
    }
}

/// Project-financial metrics scraped from one dashboard report.
///
/// Every field is always present. Amounts are whole currency units and
/// percentages are hundredths of a percent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRecord {
    pub project_name: String,
    pub project_code: String,
    pub client_name: String,
    pub project_manager: String,
    pub contract_value: i64,
    pub baseline_budget: i64,
    #[serde(rename = "baselineGPM")]
    pub baseline_gpm: i64,
    pub working_budget: i64,
    #[serde(rename = "currentGPM")]
    pub current_gpm: i64,
    pub actual_costs: i64,
    pub project_progress: i64,
}

impl DashboardRecord {
    /// Stores `value` into `field`.
    ///
    /// Returns `false` and leaves the record untouched when the value's
    /// variant does not match the field's [`FieldKind`].
    pub fn set(&mut self, field: DashboardField, value: FieldValue) -> bool {
        match (field, value) {
            (DashboardField::ProjectName, FieldValue::Text(s)) => self.project_name = s,
            (DashboardField::ProjectCode, FieldValue::Text(s)) => self.project_code = s,
            (DashboardField::ClientName, FieldValue::Text(s)) => self.client_name = s,
            (DashboardField::ProjectManager, FieldValue::Text(s)) => self.project_manager = s,
            (DashboardField::ContractValue, FieldValue::Integer(n)) => self.contract_value = n,
            (DashboardField::BaselineBudget, FieldValue::Integer(n)) => self.baseline_budget = n,
            (DashboardField::BaselineGpm, FieldValue::Integer(n)) => self.baseline_gpm = n,
            (DashboardField::WorkingBudget, FieldValue::Integer(n)) => self.working_budget = n,
            (DashboardField::CurrentGpm, FieldValue::Integer(n)) => self.current_gpm = n,
            (DashboardField::ActualCosts, FieldValue::Integer(n)) => self.actual_costs = n,
            (DashboardField::ProjectProgress, FieldValue::Integer(n)) => self.project_progress = n,
            _ => return false,
        }
        true
    }
}

/// The failure shape: a single `error` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorRecord {
    pub error: String,
}

impl ErrorRecord {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Everything a single invocation can print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputEnvelope {
    Dashboard(DashboardRecord),
    Error(ErrorRecord),
}

impl OutputEnvelope {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<DashboardRecord> for OutputEnvelope {
    fn from(record: DashboardRecord) -> Self {
        Self::Dashboard(record)
    }
}

impl From<ErrorRecord> for OutputEnvelope {
    fn from(record: ErrorRecord) -> Self {
        Self::Error(record)
    }
}
