//! Weekday type with an explicit Monday origin
//!
//! Training weeks run Monday (index 0) through Sunday (index 6). Keeping the
//! origin in one documented type avoids off-by-one mistakes when converting
//! day indices to calendar dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day of the training week. `Mon` is day 0, `Sun` is day 6.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
  Mon,
  Tue,
  Wed,
  Thu,
  Fri,
  Sat,
  Sun,
}

impl Weekday {
  pub const ALL: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
  ];

  /// Zero-based index from Monday.
  pub fn index(self) -> u8 {
    match self {
      Weekday::Mon => 0,
      Weekday::Tue => 1,
      Weekday::Wed => 2,
      Weekday::Thu => 3,
      Weekday::Fri => 4,
      Weekday::Sat => 5,
      Weekday::Sun => 6,
    }
  }

  pub fn from_index(index: u8) -> Option<Self> {
    Self::ALL.get(index as usize).copied()
  }

  /// The weekday a calendar date falls on.
  pub fn from_date(date: NaiveDate) -> Self {
    use chrono::Datelike;
    // num_days_from_monday is 0..=6, always a valid index
    Self::from_index(date.weekday().num_days_from_monday() as u8)
      .unwrap_or(Weekday::Mon)
  }

  /// Calendar date of this weekday within the week starting at `week_start`.
  /// `week_start` is expected to be a Monday.
  pub fn date_in_week(self, week_start: NaiveDate) -> NaiveDate {
    week_start + chrono::Duration::days(i64::from(self.index()))
  }

  /// Signed day distance from `other` to `self`.
  pub fn days_after(self, other: Weekday) -> i8 {
    self.index() as i8 - other.index() as i8
  }

  pub fn name(self) -> &'static str {
    match self {
      Weekday::Mon => "Monday",
      Weekday::Tue => "Tuesday",
      Weekday::Wed => "Wednesday",
      Weekday::Thu => "Thursday",
      Weekday::Fri => "Friday",
      Weekday::Sat => "Saturday",
      Weekday::Sun => "Sunday",
    }
  }
}

impl std::fmt::Display for Weekday {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_monday_origin() {
    assert_eq!(Weekday::Mon.index(), 0);
    assert_eq!(Weekday::Sun.index(), 6);
    assert_eq!(Weekday::from_index(3), Some(Weekday::Thu));
    assert_eq!(Weekday::from_index(7), None);
  }

  #[test]
  fn test_from_date() {
    // 2026-08-03 is a Monday
    let monday = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
    assert_eq!(Weekday::from_date(monday), Weekday::Mon);
    assert_eq!(
      Weekday::from_date(monday + chrono::Duration::days(6)),
      Weekday::Sun
    );
  }

  #[test]
  fn test_date_in_week() {
    let monday = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
    assert_eq!(
      Weekday::Wed.date_in_week(monday),
      NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    );
  }

  #[test]
  fn test_days_after() {
    assert_eq!(Weekday::Sat.days_after(Weekday::Tue), 4);
    assert_eq!(Weekday::Mon.days_after(Weekday::Sun), -6);
  }
}
