//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository error types, so the
//! conversion out of [`TypeConstraintError`] lives here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_constraint_failures_are_not_client_errors() {
        let repo = RepositoryError::from(TypeConstraintError::NonPositiveId);
        assert!(matches!(repo, RepositoryError::ValidationError(_)));
    }
}
