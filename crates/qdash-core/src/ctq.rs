//! Daily Critical-to-Quality (CTQ) measurements and their health score.
//!
//! Five independent pass/fail checks each contribute one point; the 0–5
//! score maps to a recommendation for the shift.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Defect rate (%) must be strictly below this to score.
pub const MAX_DEFECT_RATE: f64 = 1.0;
/// First-pass yield (%) must be at least this to score.
pub const MIN_FIRST_PASS_YIELD: f64 = 95.0;
/// Scrap units must be at most this to score.
pub const MAX_SCRAP_UNITS: u32 = 2;
/// Highest possible health score.
pub const MAX_SCORE: u8 = 5;

// ─── Measurements ────────────────────────────────────────────────────────────

/// One day's CTQ measurements as entered on the form. Missing fields take
/// the form's initial values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtqMeasurements {
  /// Daily defect rate, percent.
  pub defect_rate:        f64,
  /// First-pass yield, percent.
  pub first_pass_yield:   f64,
  pub downtime_events:    u32,
  pub scrap_units:        u32,
  pub calibration_misses: u32,
}

impl Default for CtqMeasurements {
  /// The form's initial values.
  fn default() -> Self {
    Self {
      defect_rate:        0.0,
      first_pass_yield:   100.0,
      downtime_events:    0,
      scrap_units:        0,
      calibration_misses: 0,
    }
  }
}

fn check_percent(field: &'static str, value: f64) -> Result<()> {
  if value.is_finite() && (0.0..=100.0).contains(&value) {
    Ok(())
  } else {
    Err(Error::OutOfRange { field, value, min: 0.0, max: 100.0 })
  }
}

impl CtqMeasurements {
  /// Reject percentages outside `[0, 100]`.
  pub fn validate(&self) -> Result<()> {
    check_percent("defect_rate", self.defect_rate)?;
    check_percent("first_pass_yield", self.first_pass_yield)?;
    Ok(())
  }

  /// The 0–5 health score.
  pub fn health_score(&self) -> u8 {
    [
      self.defect_rate < MAX_DEFECT_RATE,
      self.first_pass_yield >= MIN_FIRST_PASS_YIELD,
      self.downtime_events == 0,
      self.scrap_units <= MAX_SCRAP_UNITS,
      self.calibration_misses == 0,
    ]
    .into_iter()
    .map(u8::from)
    .sum()
  }
}

// ─── Recommendation ──────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
pub enum Recommendation {
  Excellent,
  Caution,
  #[serde(rename = "Immediate Action Needed")]
  #[strum(serialize = "Immediate Action Needed")]
  ImmediateActionNeeded,
}

impl Recommendation {
  pub fn for_score(score: u8) -> Self {
    match score {
      s if s >= MAX_SCORE => Self::Excellent,
      3 | 4 => Self::Caution,
      _ => Self::ImmediateActionNeeded,
    }
  }

  pub fn label(self) -> &'static str { self.into() }

  /// The line shown to the operator after submitting.
  pub fn advice(self) -> &'static str {
    match self {
      Self::Excellent => "Keep it up!",
      Self::Caution => "Monitor closely.",
      Self::ImmediateActionNeeded => "Immediate Action Needed!",
    }
  }

  /// Parse a stored recommendation.
  ///
  /// Besides the bare labels this accepts the longer decorated wording older
  /// CSV files carry, e.g. `"⚠️ Caution - Monitor closely."`.
  pub fn parse(label: &str) -> Result<Self> {
    let label = label.trim();
    if let Ok(r) = Recommendation::from_str(label) {
      return Ok(r);
    }
    [Self::Excellent, Self::Caution, Self::ImmediateActionNeeded]
      .into_iter()
      .find(|r| label.contains(r.label()))
      .ok_or_else(|| Error::UnknownRecommendation(label.to_owned()))
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A persisted CTQ day. Score and recommendation are derived on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtqRecord {
  pub date:           NaiveDate,
  #[serde(flatten)]
  pub measurements:   CtqMeasurements,
  pub health_score:   u8,
  pub recommendation: Recommendation,
}

impl CtqRecord {
  /// Validate `measurements` and derive score and recommendation.
  pub fn evaluate(date: NaiveDate, measurements: CtqMeasurements) -> Result<Self> {
    measurements.validate()?;
    let health_score = measurements.health_score();
    Ok(Self {
      date,
      measurements,
      health_score,
      recommendation: Recommendation::for_score(health_score),
    })
  }
}
