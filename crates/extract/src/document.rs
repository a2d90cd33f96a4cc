use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// An uploaded document (proforma, receipt, ...).
///
/// File storage is an external collaborator; this is just the payload handed
/// to the extractor. Content is kept as raw bytes so non-text uploads pass
/// through without erroring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Lossy text view of the content for line scanning.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}
