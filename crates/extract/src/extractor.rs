//! Line-scanning extraction of vendor, items and total.

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Document;

/// One line item recovered from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub name: String,
    pub qty: u32,
    pub unit_price: Decimal,
}

/// Best-effort extraction output. Empty fields mean "not recovered".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub vendor: Option<String>,
    pub items: Vec<ExtractedItem>,
    pub total: Decimal,
}

impl Extraction {
    pub fn empty() -> Self {
        Self {
            vendor: None,
            items: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vendor.is_none() && self.items.is_empty()
    }
}

/// Document extraction seam.
///
/// Implementations must never fail: on unreadable input they return an empty
/// extraction. Accuracy is explicitly not guaranteed; downstream code treats
/// the output as unvalidated.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, document: &Document) -> Extraction;
}

/// Scans the document text line by line.
///
/// Recognizes a `Vendor: <name>` header and item lines of the shape
/// `<name> <qty> <unit price>`; the total is the sum over recovered items.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    vendor_re: Regex,
    item_re: Regex,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self {
            vendor_re: Regex::new(r"(?i)vendor[:\s]+(.+)").expect("vendor pattern is valid"),
            item_re: Regex::new(r"^(.+?)\s+(\d+)\s+([\d,]*\.?\d+)\s*$")
                .expect("item pattern is valid"),
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for TextExtractor {
    fn extract(&self, document: &Document) -> Extraction {
        let text = document.text();

        let vendor = self
            .vendor_re
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|v| !v.is_empty());

        let mut items = Vec::new();
        for line in text.lines() {
            let Some(caps) = self.item_re.captures(line.trim()) else {
                continue;
            };
            let name = caps[1].trim().to_string();
            let Ok(qty) = caps[2].parse::<u32>() else {
                continue;
            };
            let Ok(unit_price) = caps[3].replace(',', "").parse::<Decimal>() else {
                continue;
            };
            items.push(ExtractedItem {
                name,
                qty,
                unit_price,
            });
        }

        let total: Decimal = items
            .iter()
            .map(|item| Decimal::from(item.qty) * item.unit_price)
            .sum();

        if vendor.is_none() && items.is_empty() {
            tracing::debug!(file_name = %document.file_name, "nothing recovered from document");
        }

        Extraction {
            vendor,
            items,
            total,
        }
    }
}

/// Extractor that recovers nothing; used in tests and as a stand-in when no
/// extraction backend is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExtractor;

impl DocumentExtractor for NullExtractor {
    fn extract(&self, _document: &Document) -> Extraction {
        Extraction::empty()
    }
}
