use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The date format accepted on maintenance records.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lifecycle state of a maintenance record.
///
/// `Done` is a completed service event with a mandatory cost; `Scheduled` is
/// a future-intent record whose date may lie anywhere on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// The service has been carried out.
    Done,
    /// The service is booked but not yet carried out.
    Scheduled,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Done => write!(f, "Done"),
            Self::Scheduled => write!(f, "Scheduled"),
        }
    }
}

/// A single service event in a vehicle's maintenance history.
///
/// Records are immutable once created and owned exclusively by the vehicle
/// whose history they belong to. The date is kept exactly as entered
/// (`YYYY-MM-DD` expected); [`MaintenanceRecord::parsed_date`] returns `None`
/// rather than failing when the stored text does not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    /// Calendar date of the service, as entered.
    date: String,
    /// What was (or will be) done, e.g. "Oil change".
    kind: String,
    /// Cost in currency units. Mandatory for `Done` records.
    cost: Option<f64>,
    /// Free-form notes.
    notes: String,
    /// Lifecycle state.
    status: Status,
}

/// Reasons a maintenance record fails validation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InvalidRecord {
    /// The service kind was empty or whitespace.
    #[error("the service kind must not be empty")]
    EmptyKind,

    /// No date was supplied.
    #[error("the service date is required")]
    MissingDate,

    /// The date text could not be parsed.
    #[error("unrecognised date '{0}': use YYYY-MM-DD")]
    UnparseableDate(String),

    /// A completed service was dated after today.
    #[error("a service marked Done cannot be dated in the future")]
    FutureDate,

    /// A completed service was recorded without a cost.
    #[error("a service marked Done requires a cost")]
    MissingCost,

    /// The cost was negative or not a number.
    #[error("the cost must be a non-negative amount, got {0}")]
    InvalidCost(f64),
}

impl MaintenanceRecord {
    /// Creates a record from raw form input.
    ///
    /// No validation happens here; call [`Self::validate`] before accepting
    /// the record into a vehicle's history.
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        kind: impl Into<String>,
        cost: Option<f64>,
        notes: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            date: date.into(),
            kind: kind.into(),
            cost,
            notes: notes.into(),
            status,
        }
    }

    /// Checks the record against the rules for its status.
    ///
    /// `today` anchors the future-date check for `Done` records; a
    /// `Scheduled` record may be dated in the past, present, or future.
    ///
    /// # Errors
    ///
    /// Returns the first rule the record breaks: empty kind, missing or
    /// unparseable date, a `Done` record dated after `today`, or a `Done`
    /// record with a missing, negative, or non-numeric cost.
    pub fn validate(&self, today: NaiveDate) -> Result<(), InvalidRecord> {
        if self.kind.trim().is_empty() {
            return Err(InvalidRecord::EmptyKind);
        }
        if self.date.is_empty() {
            return Err(InvalidRecord::MissingDate);
        }
        let Some(date) = self.parsed_date() else {
            return Err(InvalidRecord::UnparseableDate(self.date.clone()));
        };
        if self.status == Status::Done {
            if date > today {
                return Err(InvalidRecord::FutureDate);
            }
            match self.cost {
                None => return Err(InvalidRecord::MissingCost),
                Some(cost) if cost.is_nan() || cost < 0.0 => {
                    return Err(InvalidRecord::InvalidCost(cost));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// The service date, if the stored text parses as `YYYY-MM-DD`.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    /// Renders a one-line human-readable summary.
    ///
    /// The cost appears only on `Done` records; notes are parenthesised and
    /// the status bracketed, e.g.
    /// `Oil change on 01/05/2024 - R$150.00 (synthetic oil) [Done]`.
    #[must_use]
    pub fn format(&self) -> String {
        let date = self.parsed_date().map_or_else(
            || "unknown date".to_string(),
            |d| d.format("%d/%m/%Y").to_string(),
        );
        let mut line = format!("{} on {date}", self.kind);
        if self.status == Status::Done {
            if let Some(cost) = self.cost {
                line.push_str(&format!(" - R${cost:.2}"));
            }
        }
        if !self.notes.is_empty() {
            line.push_str(&format!(" ({})", self.notes));
        }
        line.push_str(&format!(" [{}]", self.status));
        line
    }

    /// The service date exactly as entered.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// The service kind label.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The recorded cost, if any.
    #[must_use]
    pub const fn cost(&self) -> Option<f64> {
        self.cost
    }

    /// Free-form notes attached to the record.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// The lifecycle state of the record.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{InvalidRecord, MaintenanceRecord, Status};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn done_record_with_cost_and_past_date_is_valid() {
        let record =
            MaintenanceRecord::new("2024-05-01", "Oil change", Some(150.0), "", Status::Done);
        assert_eq!(record.validate(today()), Ok(()));
    }

    #[test]
    fn done_record_dated_tomorrow_is_invalid() {
        let record = MaintenanceRecord::new("2024-05-11", "Brakes", Some(80.0), "", Status::Done);
        assert_eq!(record.validate(today()), Err(InvalidRecord::FutureDate));
    }

    #[test]
    fn scheduled_record_dated_tomorrow_is_valid() {
        let record = MaintenanceRecord::new("2024-05-11", "Brakes", None, "", Status::Scheduled);
        assert_eq!(record.validate(today()), Ok(()));
    }

    #[test]
    fn empty_kind_is_rejected() {
        let record = MaintenanceRecord::new("2024-05-01", "   ", Some(10.0), "", Status::Done);
        assert_eq!(record.validate(today()), Err(InvalidRecord::EmptyKind));
    }

    #[test]
    fn missing_date_is_rejected() {
        let record = MaintenanceRecord::new("", "Tyres", None, "", Status::Scheduled);
        assert_eq!(record.validate(today()), Err(InvalidRecord::MissingDate));
    }

    #[test]
    fn unparseable_date_is_rejected_and_parses_to_none() {
        let record = MaintenanceRecord::new("next tuesday", "Tyres", None, "", Status::Scheduled);
        assert_eq!(record.parsed_date(), None);
        assert_eq!(
            record.validate(today()),
            Err(InvalidRecord::UnparseableDate("next tuesday".to_string()))
        );
    }

    #[test]
    fn done_record_without_cost_is_rejected() {
        let record = MaintenanceRecord::new("2024-05-01", "Oil change", None, "", Status::Done);
        assert_eq!(record.validate(today()), Err(InvalidRecord::MissingCost));
    }

    #[test]
    fn negative_cost_is_rejected() {
        let record =
            MaintenanceRecord::new("2024-05-01", "Oil change", Some(-5.0), "", Status::Done);
        assert_eq!(
            record.validate(today()),
            Err(InvalidRecord::InvalidCost(-5.0))
        );
    }

    #[test]
    fn format_includes_cost_only_when_done() {
        let done =
            MaintenanceRecord::new("2024-05-01", "Oil change", Some(150.0), "5W30", Status::Done);
        assert_eq!(
            done.format(),
            "Oil change on 01/05/2024 - R$150.00 (5W30) [Done]"
        );

        let scheduled =
            MaintenanceRecord::new("2024-05-20", "Alignment", Some(90.0), "", Status::Scheduled);
        assert_eq!(scheduled.format(), "Alignment on 20/05/2024 [Scheduled]");
    }
}
