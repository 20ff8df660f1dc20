//! Spreadsheet export of a Pareto report.

use qdash_core::pareto::{ParetoReport, ParetoView};
use rust_xlsxwriter::{Format, Workbook};

use crate::Result;

const SHEET_NAME: &str = "Pareto";

/// A single-sheet workbook holding exactly the columns of `view`.
pub fn pareto_xlsx(report: &ParetoReport, view: ParetoView) -> Result<Vec<u8>> {
  let mut workbook = Workbook::new();
  let bold = Format::new().set_bold();

  let sheet = workbook.add_worksheet();
  sheet.set_name(SHEET_NAME)?;

  for (col, name) in view.columns().iter().enumerate() {
    sheet.write_string_with_format(0, col as u16, *name, &bold)?;
  }

  for (i, row) in report.display_rows(view).iter().enumerate() {
    let r = i as u32 + 1;
    let mut col: u16 = 0;
    sheet.write_string(r, col, row.reason.as_str())?;
    col += 1;
    if let Some(count) = row.count {
      sheet.write_number(r, col, count as f64)?;
      col += 1;
    }
    sheet.write_number(r, col, row.percentage)?;
    sheet.write_number(r, col + 1, row.ppm)?;
  }

  Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
  use qdash_core::{
    pareto::aggregate,
    rework::{DateRange, ReworkEntry},
  };

  use super::*;

  #[test]
  fn workbook_is_a_zip_container() {
    let day = chrono::NaiveDate::from_ymd_opt(2024, 3, 1);
    let entries = vec![ReworkEntry::new("Scratch", day), ReworkEntry::new("Dent", day)];
    let report = aggregate(&entries, DateRange::spanning(&entries));

    for view in [ParetoView::Internal, ParetoView::Customer] {
      let bytes = pareto_xlsx(&report, view).unwrap();
      assert_eq!(&bytes[..2], b"PK");
    }
  }

  #[test]
  fn empty_report_still_exports() {
    let report = aggregate(&[], None);
    let bytes = pareto_xlsx(&report, ParetoView::Internal).unwrap();
    assert!(!bytes.is_empty());
  }
}
