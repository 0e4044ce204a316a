use std::path::Path;

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;

/// A user-selected file, immutable once picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryAsset {
    name: String,
    mime_type: String,
    bytes: Bytes,
}

impl BinaryAsset {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads `path` and guesses the mime type from its extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("'{}' has no usable file name", path.display()))?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Form contents at the moment the reporter presses submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionInput {
    pub image: Option<BinaryAsset>,
    pub audio: Option<BinaryAsset>,
    pub text_description: String,
}

impl SubmissionInput {
    pub fn new(image: BinaryAsset) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    pub fn with_audio(mut self, audio: BinaryAsset) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_description = text.into();
        self
    }
}
