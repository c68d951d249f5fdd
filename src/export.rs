//! Exporters for stored vacancies
//!
//! Writes vacancies as an XLSX workbook, a semicolon-separated CSV file or a
//! JSON array shaped like the data file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use serde_json::Value;

use crate::config::{DEFAULT_CSV_FILENAME, DEFAULT_EXCEL_FILENAME, DEFAULT_JSON_FILENAME};
use crate::data::Vacancy;
use crate::error::{Result, VacancyError};
use crate::store::write_atomically;

/// Records per worksheet in an XLSX export
pub const XLSX_CHUNK_SIZE: usize = 1000;

/// Field separator for CSV exports
pub const CSV_SEPARATOR: u8 = b';';

/// UTF-8 byte-order mark so spreadsheet programs detect the encoding
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const XLSX_HEADERS: [&str; 9] = [
    "ID",
    "Title",
    "Company",
    "Salary from",
    "Salary to",
    "Area",
    "Experience",
    "Employment",
    "URL",
];

const CSV_HEADERS: [&str; 11] = [
    "ID",
    "Title",
    "Company",
    "Salary from",
    "Salary to",
    "Currency",
    "Area",
    "Experience",
    "Employment",
    "URL",
    "Source",
];

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    /// Parses a format name; accepts "xlsx"/"excel", "csv" and "json"
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<ExportFormat> {
        match s.to_lowercase().trim() {
            "xlsx" | "excel" => Some(ExportFormat::Xlsx),
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn default_filename(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => DEFAULT_EXCEL_FILENAME,
            ExportFormat::Csv => DEFAULT_CSV_FILENAME,
            ExportFormat::Json => DEFAULT_JSON_FILENAME,
        }
    }

    /// Picks the output filename: the default when blank, and for XLSX the
    /// extension is appended when missing.
    ///
    /// Only the final path component of `requested` is kept, so the result
    /// always names a file directly inside the exports directory.
    pub fn filename(&self, requested: Option<&str>) -> String {
        let name = requested
            .map(str::trim)
            .and_then(|n| Path::new(n).file_name())
            .and_then(|n| n.to_str())
            .map(str::trim)
            .filter(|n| !n.is_empty());
        match (self, name) {
            (_, None) => self.default_filename().to_string(),
            (ExportFormat::Xlsx, Some(n)) if !n.ends_with(".xlsx") => format!("{}.xlsx", n),
            (_, Some(n)) => n.to_string(),
        }
    }
}

/// Writes `vacancies` to `path` in the given format
///
/// # Returns
/// * `Ok(PathBuf)` - The written file
/// * `Err(VacancyError::NothingToExport)` - `vacancies` is empty
/// * `Err(VacancyError::Export | Storage)` - Writing failed
pub fn export(vacancies: &[Vacancy], format: ExportFormat, path: &Path) -> Result<PathBuf> {
    if vacancies.is_empty() {
        return Err(VacancyError::NothingToExport);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| VacancyError::storage(parent, e))?;
        }
    }

    let started = Instant::now();
    match format {
        ExportFormat::Xlsx => export_xlsx(vacancies, path)?,
        ExportFormat::Csv => export_csv(vacancies, path)?,
        ExportFormat::Json => export_json(vacancies, path)?,
    }

    info!(
        "Exported {} vacancies as {} to {} in {:.2?}",
        vacancies.len(),
        format.extension(),
        path.display(),
        started.elapsed()
    );
    Ok(path.to_path_buf())
}

/// One worksheet per `XLSX_CHUNK_SIZE` records, bold centered header, autofit columns
pub fn export_xlsx(vacancies: &[Vacancy], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_align(FormatAlign::Center);

    for (index, chunk) in vacancies.chunks(XLSX_CHUNK_SIZE).enumerate() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(format!("Vacancies_{}", index + 1))?;

        for (col, header) in XLSX_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (offset, vacancy) in chunk.iter().enumerate() {
            let row = offset as u32 + 1;
            worksheet.write_string(row, 0, &vacancy.id)?;
            worksheet.write_string(row, 1, &vacancy.name)?;
            worksheet.write_string(row, 2, &vacancy.company)?;
            if let Some(from) = vacancy.salary.as_ref().and_then(|s| s.from) {
                worksheet.write_number(row, 3, from as f64)?;
            }
            if let Some(to) = vacancy.salary.as_ref().and_then(|s| s.to) {
                worksheet.write_number(row, 4, to as f64)?;
            }
            worksheet.write_string(row, 5, &vacancy.area)?;
            worksheet.write_string(row, 6, &vacancy.experience)?;
            worksheet.write_string(row, 7, &vacancy.employment)?;
            worksheet.write_string(row, 8, &vacancy.url)?;
        }

        worksheet.autofit();
    }

    workbook.save(path)?;
    Ok(())
}

/// Semicolon-separated, UTF-8 with a byte-order mark
pub fn export_csv(vacancies: &[Vacancy], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| VacancyError::storage(path, e))?;
    let mut out = BufWriter::new(file);
    out.write_all(UTF8_BOM)
        .map_err(|e| VacancyError::storage(path, e))?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(CSV_SEPARATOR)
        .from_writer(out);

    writer.write_record(CSV_HEADERS)?;
    for vacancy in vacancies {
        let salary = vacancy.salary.as_ref();
        writer.write_record([
            vacancy.id.clone(),
            vacancy.name.clone(),
            vacancy.company.clone(),
            salary.and_then(|s| s.from).map(|n| n.to_string()).unwrap_or_default(),
            salary.and_then(|s| s.to).map(|n| n.to_string()).unwrap_or_default(),
            salary.map(|s| s.currency.clone()).unwrap_or_default(),
            vacancy.area.clone(),
            vacancy.experience.clone(),
            vacancy.employment.clone(),
            vacancy.url.clone(),
            vacancy.source.clone(),
        ])?;
    }

    writer.flush().map_err(|e| VacancyError::storage(path, e))?;
    Ok(())
}

/// Same array-of-mappings shape as the data file
pub fn export_json(vacancies: &[Vacancy], path: &Path) -> Result<()> {
    let mapped: Vec<Value> = vacancies.iter().map(Vacancy::to_mapping).collect();
    let json = serde_json::to_string_pretty(&mapped)?;
    write_atomically(path, json.as_bytes()).map_err(|e| VacancyError::storage(path, e))
}
