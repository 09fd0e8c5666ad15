//! Tabular snapshots of the collected data and their `.xlsx` rendering.
//!
//! A [`Sheet`] is one header row followed by exactly one row per record.

use crate::models::{FeedbackRecord, NotInterestedUser, Registrant};
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Workbook, XlsxError};

/// Most characters a single xlsx cell can hold.
pub const MAX_CELL_CHARS: usize = 32_767;

pub const XLSX_CONTENT_TYPE: (&str, &str) = (
    "application",
    "vnd.openxmlformats-officedocument.spreadsheetml.sheet",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Users,
    Creators,
    NotInterested,
    Feedback,
}

impl ExportTable {
    pub fn parse(s: &str) -> Result<ExportTable, String> {
        match s.trim() {
            "users" => Ok(Self::Users),
            "creators" => Ok(Self::Creators),
            "not_interested" => Ok(Self::NotInterested),
            "feedback" => Ok(Self::Feedback),
            other => Err(format!(
                "Unknown table '{}'. Use one of: users, creators, not_interested, feedback.",
                other
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportTable::Users => "users",
            ExportTable::Creators => "creators",
            ExportTable::NotInterested => "not_interested",
            ExportTable::Feedback => "feedback",
        }
    }

    /// `<table>_export_<YYYYMMDD_HHMMSS>.xlsx`
    pub fn file_name(&self, at: DateTime<Utc>) -> String {
        format!("{}_export_{}.xlsx", self.as_str(), at.format("%Y%m%d_%H%M%S"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i32),
    Bool(bool),
    Empty,
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map_or(Cell::Empty, Cell::Text)
    }
}

impl From<Option<i32>> for Cell {
    fn from(value: Option<i32>) -> Self {
        value.map_or(Cell::Empty, Cell::Int)
    }
}

impl From<Option<DateTime<Utc>>> for Cell {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Cell::Empty, |at| Cell::Text(at.to_rfc3339()))
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(value: DateTime<Utc>) -> Self {
        Cell::Text(value.to_rfc3339())
    }
}

pub trait SheetRow {
    const HEADER: &'static [&'static str];

    fn into_cells(self) -> Vec<Cell>;
}

impl SheetRow for Registrant {
    const HEADER: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "phone_number",
        "gender",
        "profession",
        "interest_reason",
        "created_at",
        "updated_at",
    ];

    fn into_cells(self) -> Vec<Cell> {
        vec![
            Cell::Text(self.id.to_string()),
            Cell::Text(self.name),
            Cell::Text(self.email),
            Cell::Text(self.phone_number),
            self.gender.into(),
            self.profession.into(),
            self.interest_reason.into(),
            self.created_at.into(),
            self.updated_at.into(),
        ]
    }
}

impl SheetRow for NotInterestedUser {
    const HEADER: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "not_interested_reason",
        "improvement_suggestions",
        "created_at",
    ];

    fn into_cells(self) -> Vec<Cell> {
        vec![
            Cell::Text(self.id.to_string()),
            Cell::Text(self.name),
            Cell::Text(self.email),
            self.not_interested_reason.into(),
            self.improvement_suggestions.into(),
            self.created_at.into(),
        ]
    }
}

impl SheetRow for FeedbackRecord {
    const HEADER: &'static [&'static str] = &[
        "session_id",
        "status",
        "created_at",
        "completed_at",
        "visual_design_rating",
        "visual_design_comments",
        "ease_of_navigation_rating",
        "ease_of_navigation_comments",
        "mobile_responsiveness_rating",
        "mobile_responsiveness_comments",
        "overall_satisfaction_rating",
        "overall_satisfaction_comments",
        "task_completion_rating",
        "task_completion_comments",
        "service_quality_rating",
        "service_quality_comments",
        "liked_features",
        "improvement_suggestions",
        "desired_features",
        "legal_challenges",
        "additional_comments",
        "recommend_rating",
        "follow_up_consent",
        "follow_up_email",
    ];

    fn into_cells(self) -> Vec<Cell> {
        let mut cells = vec![
            Cell::Text(self.session.session_id.to_string()),
            Cell::Text(self.session.status),
            self.session.created_at.into(),
            self.session.completed_at.into(),
        ];

        match self.ui_ratings {
            Some(ui) => cells.extend([
                Cell::Int(ui.visual_design_rating),
                ui.visual_design_comments.into(),
                Cell::Int(ui.ease_of_navigation_rating),
                ui.ease_of_navigation_comments.into(),
                Cell::Int(ui.mobile_responsiveness_rating),
                ui.mobile_responsiveness_comments.into(),
            ]),
            None => cells.extend(std::iter::repeat(Cell::Empty).take(6)),
        }

        match self.ux_ratings {
            Some(ux) => cells.extend([
                Cell::Int(ux.overall_satisfaction_rating),
                ux.overall_satisfaction_comments.into(),
                Cell::Int(ux.task_completion_rating),
                ux.task_completion_comments.into(),
                Cell::Int(ux.service_quality_rating),
                ux.service_quality_comments.into(),
            ]),
            None => cells.extend(std::iter::repeat(Cell::Empty).take(6)),
        }

        match self.suggestions {
            Some(s) => cells.extend([
                s.liked_features.into(),
                s.improvement_suggestions.into(),
                s.desired_features.into(),
                s.legal_challenges.into(),
                s.additional_comments.into(),
                s.recommend_rating.into(),
                Cell::Bool(s.follow_up_consent),
                s.follow_up_email.into(),
            ]),
            None => cells.extend(std::iter::repeat(Cell::Empty).take(8)),
        }

        cells
    }
}

#[derive(Debug)]
pub struct Sheet {
    name: &'static str,
    header: &'static [&'static str],
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn from_rows<T: SheetRow>(name: &'static str, rows: Vec<T>) -> Sheet {
        Sheet {
            name,
            header: T::HEADER,
            rows: rows.into_iter().map(SheetRow::into_cells).collect(),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn header(&self) -> &[&'static str] {
        self.header
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn to_xlsx(&self) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.name)?;

        for (col, title) in self.header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title)?;
        }
        for (index, row) in self.rows.iter().enumerate() {
            let row_num = index as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_num, col, fit_cell(text))?;
                    }
                    Cell::Int(value) => {
                        worksheet.write_number(row_num, col, *value as f64)?;
                    }
                    Cell::Bool(value) => {
                        worksheet.write_boolean(row_num, col, *value)?;
                    }
                    Cell::Empty => {}
                }
            }
        }

        workbook.save_to_buffer()
    }
}

/// Cuts `text` down to what a cell accepts, on a char boundary.
fn fit_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
