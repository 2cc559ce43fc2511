//! Bundle structural validation
//!
//! Pure checks, no side effects. Errors accumulate; the caller decides how
//! to react. The manifest check is independent of the form and workflow
//! checks, so one broken section never masks another.

use serde::{Deserialize, Serialize};

use crate::models::bundle::Bundle;

/// Outcome of validating a bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate a bundle's structure
pub fn validate_bundle(bundle: &Bundle) -> ValidationReport {
    let mut errors = Vec::new();

    let Some(manifest) = &bundle.manifest else {
        // Without a manifest the section contents cannot be attributed to a
        // package; report only the missing manifest.
        return ValidationReport::from_errors(vec!["bundle manifest is missing".to_string()]);
    };

    if manifest.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        errors.push("manifest name is missing".to_string());
    }
    if manifest
        .version
        .as_deref()
        .map_or(true, |v| v.trim().is_empty())
    {
        errors.push("manifest version is missing".to_string());
    }

    for (index, form) in bundle.forms.iter().enumerate() {
        if form.name.trim().is_empty() {
            errors.push(format!("form {} has no name", index));
        }
        if form.field_configs.is_none() {
            let label = if form.name.trim().is_empty() {
                format!("form {}", index)
            } else {
                format!("form '{}'", form.name)
            };
            errors.push(format!("{} has no fieldConfigs list", label));
        }
    }

    for (index, workflow) in bundle.workflows.iter().enumerate() {
        if workflow.name.trim().is_empty() {
            errors.push(format!("workflow {} has no name", index));
        }
        let canvas_missing = match &workflow.canvas {
            None => true,
            Some(serde_json::Value::Null) => true,
            Some(_) => false,
        };
        if canvas_missing {
            let label = if workflow.name.trim().is_empty() {
                format!("workflow {}", index)
            } else {
                format!("workflow '{}'", workflow.name)
            };
            errors.push(format!("{} has no canvas", label));
        }
    }

    ValidationReport::from_errors(errors)
}
