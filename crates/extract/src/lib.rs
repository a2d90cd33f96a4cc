//! Best-effort proforma data extraction.
//!
//! The workflow core treats extraction as a black box with no guaranteed
//! accuracy: given an uploaded document it returns whatever vendor name,
//! line items and total it could recover, and **never fails**. Malformed
//! input yields an empty extraction.

pub mod document;
pub mod extractor;

pub use document::Document;
pub use extractor::{DocumentExtractor, ExtractedItem, Extraction, NullExtractor, TextExtractor};
