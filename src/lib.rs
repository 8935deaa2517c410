//! Paginated PDF reports for finished cleaning jobs.
//!
//! A run is a three-stage pipeline: `ReportData` is turned into an ordered
//! list of measured blocks, the composer places them on A4 pages through the
//! page cursor, and the PDF writer replays the recorded drawing.
//!
//! ```no_run
//! # async fn run(report: sweep_report::ReportData) -> Result<(), Box<dyn std::error::Error>> {
//! use sweep_report::{generate, output, EngineOptions};
//!
//! let generated = generate(&report, &EngineOptions::default()).await?;
//! let host = output::DirectoryHost::new("downloads");
//! output::download(&host, &generated.blob)?;
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod blocks;
pub mod canvas;
pub mod compose;
pub mod config;
pub mod cursor;
pub mod error;
pub mod finalize;
pub mod font_metrics;
pub mod image_embed;
pub mod measure;
pub mod output;
pub mod page;
pub mod pdf;
pub mod render;
pub mod report;
pub mod server;
pub mod style;
pub mod text;

use tracing::{info, warn};

pub use assets::Branding;
pub use config::EngineOptions;
pub use error::{Diagnostic, GenerationError, Result};
pub use output::ReportBlob;
pub use report::ReportData;

/// A finished document and what was absorbed while producing it.
#[derive(Debug)]
pub struct GeneratedReport {
    pub blob: ReportBlob,
    pub page_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedReport {
    pub fn image_failures(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_image_failure()).count()
    }
}

/// Generate a report: load branding, then lay out and encode synchronously.
pub async fn generate(report: &ReportData, options: &EngineOptions) -> Result<GeneratedReport> {
    let (branding, mut diagnostics) = assets::load_branding(options).await;
    let mut generated = generate_with_branding(report, &branding)?;
    diagnostics.append(&mut generated.diagnostics);
    generated.diagnostics = diagnostics;
    Ok(generated)
}

/// Synchronous core of `generate` for callers that already hold branding.
pub fn generate_with_branding(report: &ReportData, branding: &Branding) -> Result<GeneratedReport> {
    let composition = compose::compose(report, branding)?;
    let title = format!("Cleaning report - {}", report.client_name);
    let bytes = pdf::write_pdf(&composition.document, &title)?;
    let filename = output::suggested_filename(&report.client_name, report.date);
    let page_count = composition.document.page_count();

    for diagnostic in &composition.diagnostics {
        warn!(%diagnostic, "generated with diagnostic");
    }
    info!(
        filename = %filename,
        pages = page_count,
        bytes = bytes.len(),
        "report generated"
    );

    Ok(GeneratedReport {
        blob: ReportBlob { bytes, filename },
        page_count,
        diagnostics: composition.diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;
    use crate::image_embed::samples;
    use crate::report::fixtures::*;
    use crate::report::Severity;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn generates_blob_with_suggested_filename() {
        let r = report(vec![section("Kitchen", 5, 2)]);
        let generated = generate(&r, &EngineOptions::default()).await.unwrap();
        assert_eq!(generated.blob.filename, "report-jane-doe-2026-03-14.pdf");
        assert_eq!(generated.page_count, 1);
        assert!(generated.blob.bytes.starts_with(b"%PDF-"));
        assert!(generated.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn asset_failure_is_reported_but_not_fatal() {
        let r = report(vec![section("Kitchen", 2, 1)]);
        let options = EngineOptions {
            logo: Some(assets::LogoSource::File("/nonexistent/logo.png".into())),
            ..EngineOptions::default()
        };
        let generated = generate(&r, &options).await.unwrap();
        assert_eq!(generated.diagnostics.len(), 1);
        assert!(matches!(generated.diagnostics[0], Diagnostic::AssetLoadFailure { .. }));
        assert_eq!(generated.image_failures(), 0);
    }

    #[tokio::test]
    async fn invalid_report_produces_no_blob() {
        let mut r = report(vec![section("Kitchen", 2, 1)]);
        r.client_name = "   ".into();
        let err = generate(&r, &EngineOptions::default()).await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidReport(_)));
    }

    #[test]
    fn damages_land_on_matching_cards() {
        let mut r = report(vec![section("Kitchen", 2, 0), section("Bedroom", 2, 0)]);
        r.damages = vec![
            damage("Scratch on bedroom door", Severity::Medium),
            damage("Broken vase", Severity::Low),
        ];
        let composition = compose::compose(&r, &Branding::text("Sweep")).unwrap();
        let texts: Vec<&str> = composition
            .document
            .pages
            .iter()
            .flat_map(|p| p.texts())
            .collect();
        let at = |needle: &str| texts.iter().position(|t| *t == needle).unwrap();

        assert!(at("Kitchen") < at("Broken vase"));
        assert!(at("Broken vase") < at("Bedroom"));
        assert!(at("Bedroom") < at("Scratch on bedroom door"));
        assert_eq!(texts.iter().filter(|t| t.starts_with("Damages (")).count(), 2);
    }

    #[test]
    fn low_stock_panel_lists_only_depleted_items() {
        let mut r = report(vec![section("Kitchen", 2, 0)]);
        r.inventory = vec![stock("spray", 5.0, 2.0), stock("polish", 5.0, 2.0)];
        r.inventory_usage = vec![usage("spray", 4.0), usage("polish", 1.0)];
        let composition = compose::compose(&r, &Branding::text("Sweep")).unwrap();
        let page = &composition.document.pages[0];
        assert!(page.contains_text("1 / 2 bottle"));
        assert!(!page.contains_text("4 / 2 bottle"));
        assert_eq!(composition.document.blocks_of(BlockKind::Inventory).count(), 1);
    }

    #[test]
    fn photo_heavy_report_encodes() {
        let mut r = report((1..=6).map(|i| section(&format!("Room {}", i), 10, 10)).collect());
        r.before_photos = (0..6).map(|_| Some(samples::png())).collect();
        r.after_photos = (0..6).map(|_| Some(samples::jpeg())).collect();
        let generated = generate_with_branding(&r, &Branding::text("Sweep")).unwrap();
        assert!(generated.page_count > 1);
        assert_eq!(generated.image_failures(), 0);
    }
}
