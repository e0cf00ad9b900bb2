//! Project validation logic.

use crate::records::{build_circular_channel, build_drip_unit, build_pump};
use crate::schema::{CaseDef, Project, SettingsDef};
use hy_components::{Operation, Quantity};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing input: {quantity} for {context}")]
    MissingInput { quantity: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    validate_settings(&project.settings, "project settings")?;

    let mut case_ids = HashSet::new();
    for case in &project.cases {
        check_id(&case.id, "cases")?;
        if !case_ids.insert(&case.id) {
            return Err(ValidationError::DuplicateId {
                id: case.id.clone(),
                context: "cases".to_string(),
            });
        }
        validate_case(case)?;
    }

    validate_records(project)
}

fn check_id(id: &str, context: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} id"),
            value: format!("{id:?}"),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_settings(settings: &SettingsDef, context: &str) -> Result<(), ValidationError> {
    let positive = [
        ("gravity_mps2", settings.gravity_mps2),
        ("tolerance", settings.tolerance),
    ];
    for (field, value) in positive {
        if let Some(v) = value
            && !(v.is_finite() && v > 0.0)
        {
            return Err(ValidationError::InvalidValue {
                field: format!("{context} {field}"),
                value: v.to_string(),
                reason: "must be finite and positive".to_string(),
            });
        }
    }
    if settings.max_iterations == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} max_iterations"),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn parse_quantity(name: &str, context: &str) -> Result<Quantity, ValidationError> {
    name.parse().map_err(|_| ValidationError::InvalidValue {
        field: format!("{context} quantity"),
        value: name.to_string(),
        reason: "unknown quantity name".to_string(),
    })
}

fn validate_case(case: &CaseDef) -> Result<(), ValidationError> {
    let context = format!("case '{}'", case.id);
    if let Some(settings) = &case.settings {
        validate_settings(settings, &context)?;
    }

    let len = case.batch_len();
    let mut available = HashSet::new();
    for (name, values) in &case.inputs {
        let quantity = parse_quantity(name, &context)?;
        if values.len() != len {
            return Err(ValidationError::InvalidValue {
                field: format!("{context} input '{name}'"),
                value: values.len().to_string(),
                reason: format!("expected {len} values"),
            });
        }
        available.insert(quantity);
    }
    for name in case.broadcast.keys() {
        let quantity = parse_quantity(name, &context)?;
        if !available.insert(quantity) {
            return Err(ValidationError::DuplicateId {
                id: name.clone(),
                context: format!("{context} inputs and broadcast"),
            });
        }
    }

    if case.operations.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} operations"),
            value: "[]".to_string(),
            reason: "at least one operation is required".to_string(),
        });
    }

    for name in &case.operations {
        let operation: Operation = name.parse().map_err(|_| ValidationError::InvalidValue {
            field: format!("{context} operation"),
            value: name.clone(),
            reason: "unknown operation".to_string(),
        })?;
        let op_context = format!("{context} operation '{name}'");
        for quantity in operation.required() {
            if !available.contains(quantity) {
                return Err(ValidationError::MissingInput {
                    quantity: quantity.name().to_string(),
                    context: op_context,
                });
            }
        }
        if operation == Operation::BroadCrestedDischarge
            && available.contains(&Quantity::CrestLength)
            && !available.contains(&Quantity::ManningN)
        {
            return Err(ValidationError::MissingInput {
                quantity: Quantity::ManningN.name().to_string(),
                context: format!("{op_context} with crest_length"),
            });
        }
        available.extend(operation.outputs().iter().copied());
    }
    Ok(())
}

fn validate_records(project: &Project) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    for pump in &project.pumps {
        check_id(&pump.id, "pumps")?;
        if !ids.insert(&pump.id) {
            return Err(duplicate(&pump.id, "pumps"));
        }
        build_pump(pump).map_err(|e| record_error("pump", &pump.id, e))?;
    }

    let mut ids = HashSet::new();
    for channel in &project.circular_channels {
        check_id(&channel.id, "circular_channels")?;
        if !ids.insert(&channel.id) {
            return Err(duplicate(&channel.id, "circular_channels"));
        }
        build_circular_channel(channel)
            .map_err(|e| record_error("circular channel", &channel.id, e))?;
    }

    let mut ids = HashSet::new();
    for unit in &project.drip_units {
        check_id(&unit.id, "drip_units")?;
        if !ids.insert(&unit.id) {
            return Err(duplicate(&unit.id, "drip_units"));
        }
        build_drip_unit(unit).map_err(|e| record_error("drip unit", &unit.id, e))?;
    }
    Ok(())
}

fn duplicate(id: &str, context: &str) -> ValidationError {
    ValidationError::DuplicateId {
        id: id.to_string(),
        context: context.to_string(),
    }
}

fn record_error(kind: &str, id: &str, err: hy_components::ComponentError) -> ValidationError {
    ValidationError::InvalidValue {
        field: format!("{kind} '{id}'"),
        value: id.to_string(),
        reason: err.to_string(),
    }
}
