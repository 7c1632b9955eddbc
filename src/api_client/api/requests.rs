use chrono::NaiveDate;
use serde::Serialize;

use crate::types::AdminError;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TruncateRequest<'a> {
    pub tables: &'a [String],
}

/// Inclusive day range for sales and inventory uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AdminError> {
        if end < start {
            return Err(AdminError::InvalidInput(format!(
                "end date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Body of `/ventas/upload/` and `/inventory/upload/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRequest<'a> {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sucursal_id: &'a str,
}

impl<'a> UploadRequest<'a> {
    pub fn new(range: DateRange, sucursal_id: &'a str) -> Self {
        Self {
            start_date: range.start,
            end_date: range.end,
            sucursal_id,
        }
    }
}
