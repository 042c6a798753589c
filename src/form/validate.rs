//! SubmissionValidator: the gate in front of the generator.
//!
//! Checks run in a fixed order and the first failure wins: prompt, then
//! source, then destination.

use thiserror::Error;

use crate::catalog::Role;
use crate::generation::GenerationRequest;

use super::store::SelectionStore;

/// Why a submission was refused. `Display` is the user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a prompt for ETL code generation")]
    EmptyPrompt,

    #[error("Please select a data source first")]
    MissingSource,

    #[error("Please select a data destination first")]
    MissingDestination,
}

/// Validate `prompt` and the current selections into a request.
///
/// The prompt is checked trimmed but forwarded as typed.
pub fn validate(prompt: &str, store: &SelectionStore) -> Result<GenerationRequest, ValidationError> {
    if prompt.trim().is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }
    let source = store.get(Role::Source).ok_or(ValidationError::MissingSource)?;
    let destination = store
        .get(Role::Destination)
        .ok_or(ValidationError::MissingDestination)?;

    Ok(GenerationRequest {
        source,
        destination,
        prompt: prompt.to_string(),
    })
}
