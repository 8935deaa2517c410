//! Document Composer.
//!
//! Drives the ordered block list through measure, request space, render and
//! advance, then hands the closed pages to the finalization pass.
//!
//! ```text
//! Composing { next_block } --(all placed)--> Finalizing --> Done
//!          \--(geometry error)--> Failed
//! ```

use tracing::{debug, error, info};

use crate::assets::Branding;
use crate::blocks::{build_blocks, LayoutBlock};
use crate::cursor::{PageChrome, PageCursor, LAYOUT_EPSILON};
use crate::error::{Diagnostic, Result};
use crate::finalize;
use crate::page::{Document, Page};
use crate::render::RenderContext;
use crate::report::ReportData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeState {
    Composing { next_block: usize },
    Finalizing,
    Done,
    Failed,
}

/// Result of a successful run: the laid-out pages plus everything that was
/// absorbed along the way.
#[derive(Debug)]
pub struct Composition {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Composer<'r> {
    branding: &'r Branding,
    blocks: Vec<LayoutBlock<'r>>,
    cursor: Option<PageCursor>,
    pages: Vec<Page>,
    diagnostics: Vec<Diagnostic>,
    state: ComposeState,
}

impl<'r> Composer<'r> {
    pub fn new(report: &'r ReportData, branding: &'r Branding) -> Result<Self> {
        report.validate()?;
        let chrome = PageChrome {
            running_title: format!("{} - {}", report.client_name, report.date.format("%Y-%m-%d")),
            brand: branding.name.clone(),
        };
        Ok(Composer {
            branding,
            blocks: build_blocks(report),
            cursor: Some(PageCursor::new(chrome)),
            pages: Vec::new(),
            diagnostics: Vec::new(),
            state: ComposeState::Composing { next_block: 0 },
        })
    }

    pub fn state(&self) -> ComposeState {
        self.state
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Advance the machine by one transition. `Done` and `Failed` are terminal.
    pub fn step(&mut self) -> Result<ComposeState> {
        let next = match self.state {
            ComposeState::Composing { next_block } if next_block < self.blocks.len() => {
                if let Err(err) = self.place(next_block) {
                    self.state = ComposeState::Failed;
                    error!(error = %err, "composition failed");
                    return Err(err);
                }
                ComposeState::Composing {
                    next_block: next_block + 1,
                }
            }
            ComposeState::Composing { .. } => {
                if let Some(cursor) = self.cursor.take() {
                    self.pages = cursor.finish();
                }
                ComposeState::Finalizing
            }
            ComposeState::Finalizing => {
                finalize::stamp_page_numbers(&mut self.pages);
                ComposeState::Done
            }
            terminal => terminal,
        };
        self.state = next;
        Ok(next)
    }

    /// Run to completion.
    pub fn run(mut self) -> Result<Composition> {
        while self.step()? != ComposeState::Done {}

        info!(
            pages = self.pages.len(),
            blocks = self.blocks.len(),
            diagnostics = self.diagnostics.len(),
            "report composed"
        );
        Ok(Composition {
            document: Document { pages: self.pages },
            diagnostics: self.diagnostics,
        })
    }

    fn place(&mut self, index: usize) -> Result<()> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(());
        };
        let block = &self.blocks[index];
        let kind = block.kind();
        let measured = block.measure();

        let page = cursor.request_space(kind, measured)?;
        let consumed = {
            let mut frame = cursor.frame();
            let mut ctx = RenderContext {
                diagnostics: &mut self.diagnostics,
                branding: self.branding,
            };
            block.render(&mut frame, &mut ctx)
        };

        if (consumed - measured).abs() > LAYOUT_EPSILON {
            error!(block = %kind, measured, consumed, "rendered height differs from measured height");
            self.diagnostics.push(Diagnostic::LayoutOverflow {
                block: kind,
                measured,
                consumed,
            });
        }

        // Always advance by the measured height.
        cursor.advance(kind, measured);
        debug!(block = %kind, page, height = measured, "block placed");
        Ok(())
    }
}

/// Lay out a whole report.
pub fn compose(report: &ReportData, branding: &Branding) -> Result<Composition> {
    Composer::new(report, branding)?.run()
}
