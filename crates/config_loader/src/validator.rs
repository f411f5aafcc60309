//! Configuration validation
//!
//! Rules:
//! - sensorId, connectorId, connectorKey, receiver.host non-empty
//! - receiver.port > 0
//! - interval >= 1 ms
//! - receiver.host is a bare host name (no scheme, no path)

use contracts::{ConnectorBlueprint, ContractError};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Validate a ConnectorBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &ConnectorBlueprint) -> Result<(), ContractError> {
    validate_fields(blueprint)?;
    validate_receiver_host(blueprint)?;
    Ok(())
}

/// Field-level rules declared on the contract types
fn validate_fields(blueprint: &ConnectorBlueprint) -> Result<(), ContractError> {
    match blueprint.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let (field, message) = first_error("", &errors)
                .unwrap_or_else(|| ("config".to_string(), errors.to_string()));
            Err(ContractError::config_validation(field, message))
        }
    }
}

/// Host must not carry a scheme or path; `useSsl` selects the scheme
fn validate_receiver_host(blueprint: &ConnectorBlueprint) -> Result<(), ContractError> {
    let host = &blueprint.receiver.host;
    if host.contains("://") || host.contains('/') {
        return Err(ContractError::config_validation(
            "receiver.host",
            format!("host must not contain a scheme or path, got '{host}'"),
        ));
    }
    if host.chars().any(char::is_whitespace) {
        return Err(ContractError::config_validation(
            "receiver.host",
            format!("host must not contain whitespace, got '{host}'"),
        ));
    }
    Ok(())
}

/// Depth-first search for the first failing field, rendered as a config key path
fn first_error(prefix: &str, errors: &ValidationErrors) -> Option<(String, String)> {
    // Sort for a stable report when several fields fail
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in entries {
        let path = join_path(prefix, field);
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(error) = field_errors.first() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    return Some((path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(found) = first_error(&path, inner) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    if let Some(found) = first_error(&format!("{path}[{idx}]"), inner) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

fn join_path(prefix: &str, field: &str) -> String {
    let key = camel_case(field);
    if prefix.is_empty() {
        key
    } else {
        format!("{prefix}.{key}")
    }
}

/// `connector_key` -> `connectorKey`, matching the serialized names
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
