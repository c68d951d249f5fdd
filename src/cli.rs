//! Command-line interface parsing for the vacancies CLI
//!
//! This module handles parsing of CLI arguments using clap. Every subcommand
//! maps onto one manager operation; running without a subcommand opens the
//! interactive menu.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::export::ExportFormat;
use crate::filter::VacancyFilters;
use crate::manager::ManualVacancy;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified export format is not recognized
    #[error("Invalid export format: '{0}'. Valid formats: xlsx, csv, json")]
    InvalidFormat(String),
}

/// Vacancies CLI - collect hh.ru vacancies, filter them and export
#[derive(Parser, Debug)]
#[command(name = "vacancies")]
#[command(about = "Collect hh.ru job vacancies, filter them locally and export")]
#[command(version)]
pub struct Cli {
    /// Directory holding the data file, exports and logs
    #[arg(long, global = true, env = "VACANCIES_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log everything to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Search hh.ru and store the new vacancies
    Search {
        /// Search query, e.g. "Rust developer"
        query: String,
        /// Number of vacancies to request (default 20, max 100)
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Add a vacancy by hand
    Add(AddArgs),
    /// Show all stored vacancies
    List,
    /// Show stored vacancies matching the given criteria
    Filter(FilterArgs),
    /// Delete a stored vacancy by id
    Delete {
        id: String,
    },
    /// Export all stored vacancies
    ///
    /// Examples:
    ///   vacancies export xlsx
    ///   vacancies export csv --output march.csv
    Export {
        /// Output format: xlsx, csv or json
        #[arg(value_parser = parse_export_format_arg)]
        format: ExportFormat,
        /// File name inside the exports directory
        #[arg(short, long, value_name = "NAME")]
        output: Option<String>,
    },
    /// Show statistics over stored vacancies
    Stats,
    /// Delete every stored vacancy and the data file
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Open the interactive menu (default)
    Menu,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct AddArgs {
    /// Job title
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub company: String,
    #[arg(long, value_name = "AMOUNT")]
    pub salary_from: Option<i64>,
    #[arg(long, value_name = "AMOUNT")]
    pub salary_to: Option<i64>,
    /// Salary currency code (default RUB)
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long, default_value = "")]
    pub area: String,
    #[arg(long, default_value = "")]
    pub url: String,
    #[arg(long, default_value = "")]
    pub experience: String,
    #[arg(long, default_value = "")]
    pub employment: String,
    #[arg(long, default_value = "")]
    pub snippet: String,
}

impl From<AddArgs> for ManualVacancy {
    fn from(args: AddArgs) -> Self {
        ManualVacancy {
            name: args.name,
            company: args.company,
            salary_from: args.salary_from,
            salary_to: args.salary_to,
            currency: args.currency,
            area: args.area,
            url: args.url,
            published_at: None,
            snippet: args.snippet,
            experience: args.experience,
            employment: args.employment,
        }
    }
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    /// Company name contains
    #[arg(long)]
    pub company: Option<String>,
    /// Area name contains
    #[arg(long)]
    pub area: Option<String>,
    /// Either salary bound is at least this much
    #[arg(long, value_name = "AMOUNT")]
    pub min_salary: Option<i64>,
    /// Experience label contains
    #[arg(long)]
    pub experience: Option<String>,
    /// Employment label contains
    #[arg(long)]
    pub employment: Option<String>,
}

impl From<FilterArgs> for VacancyFilters {
    fn from(args: FilterArgs) -> Self {
        VacancyFilters {
            company: args.company,
            area: args.area,
            min_salary: args.min_salary,
            experience: args.experience,
            employment: args.employment,
        }
        .normalized()
    }
}

/// Parses an export format argument.
///
/// # Returns
/// * `Ok(ExportFormat)` if the string names a supported format
/// * `Err(CliError::InvalidFormat)` otherwise
pub fn parse_export_format_arg(s: &str) -> Result<ExportFormat, CliError> {
    ExportFormat::from_str(s).ok_or_else(|| CliError::InvalidFormat(s.to_string()))
}

impl Cli {
    /// The subcommand to run; the menu when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Menu)
    }
}
