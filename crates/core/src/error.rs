#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing customer record.
    pub fn customer_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "Customer",
            id: id.to_string(),
        }
    }
}
