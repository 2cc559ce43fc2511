//! Bundle models
//!
//! A bundle is the serialized package of forms/workflows definitions plus a
//! manifest that gets embedded into the deployable template. Fields the wire
//! may omit are `Option` here; structural checks happen once, in
//! [`crate::bundle::validate`], instead of ad hoc at each consumer.

use serde::{Deserialize, Serialize};

/// A deployable package of form and workflow definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Package manifest; required, but modeled as optional so the validator
    /// can report its absence instead of failing deserialization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Manifest>,

    /// Form definitions to embed
    #[serde(default)]
    pub forms: Vec<FormDef>,

    /// Workflow definitions to embed
    #[serde(default)]
    pub workflows: Vec<WorkflowDef>,
}

/// Bundle manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

/// A single form definition inside a bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDef {
    #[serde(default)]
    pub name: String,

    /// Field configuration list; must be present and list-typed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_configs: Option<Vec<serde_json::Value>>,
}

/// A single workflow definition inside a bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDef {
    #[serde(default)]
    pub name: String,

    /// Workflow canvas graph; must be present and non-null
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<serde_json::Value>,
}
