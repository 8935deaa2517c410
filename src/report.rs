//! Input model for one report run.
//!
//! `ReportData` arrives as JSON from the field app once a job is closed. Every
//! photo is already a resolved payload; nothing here touches the network.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::GenerationError;

// ============================================================================
// PHOTOS
// ============================================================================

/// An embeddable image: a `data:image/...;base64,` URL or bare base64.
///
/// Kept as the raw string so that a damaged photo never fails the whole
/// request; the embedder decodes it and degrades to a placeholder instead.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ImagePayload(String);

impl ImagePayload {
    pub fn new(source: impl Into<String>) -> Self {
        ImagePayload(source.into())
    }

    /// Wrap already-encoded image bytes (PNG, JPEG, ...).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        use base64::Engine;
        ImagePayload(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    Furniture,
    Electronics,
    Stain,
    Other,
}

impl DamageType {
    pub fn label(self) -> &'static str {
        match self {
            DamageType::Furniture => "Furniture",
            DamageType::Electronics => "Electronics",
            DamageType::Stain => "Stain",
            DamageType::Other => "Other",
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub label: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub photo_required: bool,
    #[serde(default)]
    pub photo_url: Option<ImagePayload>,
}

/// A room on the job checklist.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<Item>,
    /// Additional room photos beyond the before/after pair.
    #[serde(default)]
    pub photos: Vec<ImagePayload>,
}

impl Section {
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|i| i.completed).count()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DamageRecord {
    #[serde(rename = "type")]
    pub kind: DamageType,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo: Option<ImagePayload>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LostFoundItem {
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub photo: Option<ImagePayload>,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub quantity: f64,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUsage {
    pub item_id: String,
    pub quantity: f64,
}

// ============================================================================
// AGGREGATE
// ============================================================================

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub client_name: String,
    #[serde(default)]
    pub address: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Job or booking reference shown in the header.
    #[serde(default)]
    pub reference: Option<String>,
    pub sections: Vec<Section>,
    /// Index-aligned with `sections`.
    #[serde(default)]
    pub before_photos: Vec<Option<ImagePayload>>,
    /// Index-aligned with `sections`.
    #[serde(default)]
    pub after_photos: Vec<Option<ImagePayload>>,
    #[serde(default)]
    pub damages: Vec<DamageRecord>,
    #[serde(default)]
    pub lost_found: Vec<LostFoundItem>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub inventory_usage: Vec<InventoryUsage>,
    #[serde(default)]
    pub responsible_name: String,
    #[serde(default)]
    pub signature: Option<ImagePayload>,
}

/// Figures shown in the summary strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryStats {
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub damages: usize,
    pub lost_found: usize,
    pub photos: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEntry {
    pub name: String,
    pub unit: String,
    pub used: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LowStockEntry {
    pub name: String,
    pub unit: String,
    pub remaining: f64,
    pub threshold: f64,
}

impl ReportData {
    /// Reject input that cannot produce a meaningful document.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.client_name.trim().is_empty() {
            return Err(GenerationError::InvalidReport("client name is empty".into()));
        }
        if self.sections.is_empty() {
            return Err(GenerationError::InvalidReport("report has no sections".into()));
        }
        if let (Some(start), Some(end)) = (self.started_at, self.finished_at) {
            if end < start {
                return Err(GenerationError::InvalidReport(
                    "job finished before it started".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn before_photo(&self, section_index: usize) -> Option<&ImagePayload> {
        self.before_photos.get(section_index).and_then(Option::as_ref)
    }

    pub fn after_photo(&self, section_index: usize) -> Option<&ImagePayload> {
        self.after_photos.get(section_index).and_then(Option::as_ref)
    }

    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }

    /// Number of photos anywhere in the report. The signature is not a photo.
    pub fn photo_count(&self) -> usize {
        let paired = self.before_photos.iter().flatten().count()
            + self.after_photos.iter().flatten().count();
        let rooms: usize = self
            .sections
            .iter()
            .map(|s| s.photos.len() + s.items.iter().filter(|i| i.photo_url.is_some()).count())
            .sum();
        let damages = self.damages.iter().filter(|d| d.photo.is_some()).count();
        let lost = self.lost_found.iter().filter(|l| l.photo.is_some()).count();
        paired + rooms + damages + lost
    }

    pub fn summary(&self) -> SummaryStats {
        SummaryStats {
            tasks_completed: self.sections.iter().map(Section::completed_count).sum(),
            tasks_total: self.sections.iter().map(|s| s.items.len()).sum(),
            damages: self.damages.len(),
            lost_found: self.lost_found.len(),
            photos: self.photo_count(),
        }
    }

    /// Attribute each damage record to exactly one section.
    ///
    /// A record goes to the first section whose title shares a word with its
    /// description; records matching nothing land on the first section.
    pub fn damages_by_section(&self) -> Vec<Vec<&DamageRecord>> {
        let mut buckets: Vec<Vec<&DamageRecord>> = vec![Vec::new(); self.sections.len()];
        if buckets.is_empty() {
            return buckets;
        }

        let title_words: Vec<Vec<String>> =
            self.sections.iter().map(|s| significant_words(&s.title)).collect();

        for damage in &self.damages {
            let description = significant_words(&damage.description);
            let target = title_words
                .iter()
                .position(|words| words.iter().any(|w| description.contains(w)))
                .unwrap_or(0);
            buckets[target].push(damage);
        }
        buckets
    }

    /// Consumables taken out on this job, summed per item in first-use order.
    pub fn outgoing(&self) -> Vec<OutgoingEntry> {
        let mut order: Vec<&str> = Vec::new();
        let mut used: HashMap<&str, f64> = HashMap::new();
        for usage in &self.inventory_usage {
            let id = usage.item_id.as_str();
            if !used.contains_key(id) {
                order.push(id);
            }
            *used.entry(id).or_insert(0.0) += usage.quantity;
        }

        order
            .into_iter()
            .map(|id| {
                let item = self.inventory.iter().find(|i| i.id == id);
                OutgoingEntry {
                    name: item.map(|i| i.name.clone()).unwrap_or_else(|| id.to_string()),
                    unit: item.map(|i| i.unit.clone()).unwrap_or_default(),
                    used: used[id],
                }
            })
            .collect()
    }

    /// Items whose stock after this job's usage is at or below threshold.
    pub fn low_stock(&self) -> Vec<LowStockEntry> {
        self.inventory
            .iter()
            .filter_map(|item| {
                let used: f64 = self
                    .inventory_usage
                    .iter()
                    .filter(|u| u.item_id == item.id)
                    .map(|u| u.quantity)
                    .sum();
                let remaining = item.quantity - used;
                (remaining <= item.threshold).then(|| LowStockEntry {
                    name: item.name.clone(),
                    unit: item.unit.clone(),
                    remaining,
                    threshold: item.threshold,
                })
            })
            .collect()
    }
}

/// Lower-cased alphanumeric runs of at least three characters.
fn significant_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(str::to_lowercase)
        .collect()
}
