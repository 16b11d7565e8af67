use thiserror::Error;

use crate::contract::model::EntityKind;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("A new {entity} cannot already have an ID")]
    IdExists { entity: EntityKind },

    #[error("Invalid id: {entity} body carries no id")]
    IdNull { entity: EntityKind },

    #[error("Invalid ID: path id {path_id} does not match body id {body_id}")]
    IdInvalid {
        entity: EntityKind,
        path_id: i64,
        body_id: i64,
    },

    #[error("Entity not found: {entity} {id}")]
    IdNotFound { entity: EntityKind, id: i64 },

    #[error("{entity} not found: {key}")]
    NotFound { entity: EntityKind, key: String },

    #[error("Validation failed: {field}: {message}")]
    Validation {
        entity: EntityKind,
        field: String,
        message: String,
    },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn id_exists(entity: EntityKind) -> Self {
        Self::IdExists { entity }
    }

    pub fn id_null(entity: EntityKind) -> Self {
        Self::IdNull { entity }
    }

    pub fn id_invalid(entity: EntityKind, path_id: i64, body_id: i64) -> Self {
        Self::IdInvalid {
            entity,
            path_id,
            body_id,
        }
    }

    pub fn id_not_found(entity: EntityKind, id: i64) -> Self {
        Self::IdNotFound { entity, id }
    }

    pub fn not_found(entity: EntityKind, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(
        entity: EntityKind,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            entity,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Entity the failed operation addressed, when known.
    pub fn entity(&self) -> Option<EntityKind> {
        match self {
            Self::IdExists { entity }
            | Self::IdNull { entity }
            | Self::IdInvalid { entity, .. }
            | Self::IdNotFound { entity, .. }
            | Self::NotFound { entity, .. }
            | Self::Validation { entity, .. } => Some(*entity),
            Self::Database { .. } => None,
        }
    }
}
