//! Local checks on the report form, run before anything touches the network.

use crate::{
    asset::{BinaryAsset, SubmissionInput},
    error::ValidationError,
};

/// A submission that passed validation: image present plus at least one narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub image: BinaryAsset,
    pub audio: Option<BinaryAsset>,
    pub text_description: Option<String>,
}

/// Image first, then the voice-note-or-text rule. File size and type are not checked.
pub fn validate(input: SubmissionInput) -> Result<ValidatedSubmission, ValidationError> {
    let SubmissionInput {
        image,
        audio,
        text_description,
    } = input;

    let image = image.ok_or(ValidationError::MissingImage)?;

    let text = text_description.trim();
    let text_description = (!text.is_empty()).then(|| text.to_string());
    if audio.is_none() && text_description.is_none() {
        return Err(ValidationError::MissingNarrative);
    }

    Ok(ValidatedSubmission {
        image,
        audio,
        text_description,
    })
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
