//! Suggested KPI names and default targets for each category.
//!
//! The entry form offers these as a starting point; operators may still type
//! any KPI name and target.

use serde::Serialize;

use crate::kpi::{Category, Comparator};

/// One catalog suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
  pub category: Category,
  pub kpi:      &'static str,
  pub target:   &'static str,
}

impl CatalogEntry {
  pub fn comparator(&self) -> Comparator { Comparator::detect(self.target) }
}

pub const CATALOG: &[CatalogEntry] = &[
  CatalogEntry { category: Category::Quality,            kpi: "Defect Rate",                  target: "<1%" },
  CatalogEntry { category: Category::Quality,            kpi: "First Pass Yield",             target: ">95%" },
  CatalogEntry { category: Category::Quality,            kpi: "Customer Complaints",          target: "<2" },
  CatalogEntry { category: Category::Efficiency,         kpi: "OEE",                          target: ">85%" },
  CatalogEntry { category: Category::Efficiency,         kpi: "Daily Output",                 target: ">500 Units" },
  CatalogEntry { category: Category::Downtime,           kpi: "Unplanned Downtime",           target: "<30 minutes" },
  CatalogEntry { category: Category::Downtime,           kpi: "Changeover Time",              target: "<2 hours" },
  CatalogEntry { category: Category::Cost,               kpi: "Scrap Cost",                   target: "<$500" },
  CatalogEntry { category: Category::Cost,               kpi: "Rework Cost",                  target: "<$300" },
  CatalogEntry { category: Category::ProblemSolving,     kpi: "Open Corrective Actions",      target: "<5" },
  CatalogEntry { category: Category::ProblemSolving,     kpi: "Improvement Ideas",            target: "≥3 ideas" },
  CatalogEntry { category: Category::SafetyFiveS,        kpi: "Recordable Incidents",         target: "0" },
  CatalogEntry { category: Category::SafetyFiveS,        kpi: "5S Audit Score",               target: ">90%" },
  CatalogEntry { category: Category::EmployeeEngagement, kpi: "Absenteeism",                  target: "<3%" },
  CatalogEntry { category: Category::EmployeeEngagement, kpi: "Training Hours",               target: ">4 hours" },
];

/// Catalog entries for one category, in catalog order.
pub fn for_category(category: Category) -> impl Iterator<Item = &'static CatalogEntry> {
  CATALOG.iter().filter(move |e| e.category == category)
}
