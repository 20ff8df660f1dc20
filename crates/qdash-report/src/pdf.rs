//! PDF export of a Pareto report.
//!
//! A title, the date range, then one line per row. Long reports continue on
//! further A4 pages.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use qdash_core::pareto::{ParetoReport, ParetoView};

use crate::{Error, Result};

pub const DEFAULT_TITLE: &str = "Rework Pareto Analysis";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 7.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 11.0;
const LAYER: &str = "Layer 1";

fn pdf_err(e: impl std::fmt::Debug) -> Error { Error::Pdf(format!("{e:?}")) }

/// The body lines printed under the title.
pub fn pdf_lines(report: &ParetoReport, view: ParetoView) -> Vec<String> {
  let mut lines = Vec::with_capacity(report.rows.len() + 2);
  if let Some(range) = report.range {
    lines.push(format!("Rework dates {} to {}", range.start, range.end));
  }
  if report.is_empty() {
    lines.push("No rework entries in the selected date range.".to_owned());
  }
  lines.extend(report.rows.iter().map(|r| r.summary_line(view)));
  lines
}

/// Render `report` as a PDF document.
pub fn pareto_pdf(report: &ParetoReport, view: ParetoView, title: &str) -> Result<Vec<u8>> {
  let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
  let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
  let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;

  let mut current = doc.get_page(page).get_layer(layer);
  current.use_text(title, TITLE_SIZE, Mm(MARGIN), Mm(PAGE_HEIGHT - MARGIN), &bold);

  let mut y = PAGE_HEIGHT - MARGIN - 2.0 * LINE_HEIGHT;
  for line in pdf_lines(report, view) {
    if y < MARGIN {
      let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
      current = doc.get_page(page).get_layer(layer);
      y = PAGE_HEIGHT - MARGIN;
    }
    current.use_text(line, BODY_SIZE, Mm(MARGIN), Mm(y), &regular);
    y -= LINE_HEIGHT;
  }

  doc.save_to_bytes().map_err(pdf_err)
}
