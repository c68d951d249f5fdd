//! Text output and the interactive menu
//!
//! `print_vacancies` and `print_statistics` are shared by the subcommands and
//! the menu. `Menu` reads numbered choices from any `BufRead` and writes to
//! any `Write`, so it runs the same against a terminal or a test buffer.

use std::io::{self, BufRead, Write};

use crate::data::Vacancy;
use crate::error::VacancyError;
use crate::export::ExportFormat;
use crate::filter::VacancyFilters;
use crate::manager::{ManualVacancy, Statistics, VacancyManager};

/// Width of separator lines
const DISPLAY_WIDTH: usize = 60;

/// Entries shown in the statistics top lists
const TOP_ENTRIES: usize = 5;

/// Writes one vacancy as an indented block
pub fn write_vacancy<W: Write>(out: &mut W, index: usize, vacancy: &Vacancy) -> io::Result<()> {
    let salary = vacancy
        .salary
        .as_ref()
        .map(|s| s.display())
        .unwrap_or_else(|| "Not specified".to_string());
    let published: String = vacancy.published_at.chars().take(10).collect();

    writeln!(out, "\n{}. {}", index, vacancy.name)?;
    writeln!(out, "   Company: {}", vacancy.company)?;
    writeln!(out, "   Salary: {}", salary)?;
    writeln!(out, "   Area: {}", vacancy.area)?;
    writeln!(out, "   Experience: {}", vacancy.experience)?;
    writeln!(out, "   URL: {}", vacancy.url)?;
    writeln!(out, "   Published: {}", published)?;
    writeln!(out, "   ID: {}", vacancy.id)?;
    writeln!(out, "{}", "-".repeat(DISPLAY_WIDTH))
}

/// Writes a numbered list of vacancies, or a notice when there are none
pub fn print_vacancies<W: Write>(out: &mut W, vacancies: &[Vacancy]) -> io::Result<()> {
    if vacancies.is_empty() {
        return writeln!(out, "No vacancies to show");
    }

    writeln!(out, "\nVacancies found: {}", vacancies.len())?;
    for (i, vacancy) in vacancies.iter().enumerate() {
        write_vacancy(out, i + 1, vacancy)?;
    }
    Ok(())
}

pub fn print_statistics<W: Write>(out: &mut W, stats: &Statistics) -> io::Result<()> {
    if stats.total == 0 {
        return writeln!(out, "No data for statistics");
    }

    writeln!(out, "\nVACANCY STATISTICS")?;
    writeln!(out, "{}", "=".repeat(40))?;
    writeln!(out, "Total vacancies: {}", stats.total)?;
    writeln!(out, "With salary: {}", stats.with_salary)?;

    let sources: Vec<String> = stats
        .by_source
        .iter()
        .map(|(source, count)| format!("{}: {}", source, count))
        .collect();
    writeln!(out, "Sources: {}", sources.join(", "))?;

    writeln!(out, "\nTop companies:")?;
    for (company, count) in Statistics::top(&stats.by_company, TOP_ENTRIES) {
        writeln!(out, "  {}: {}", company, count)?;
    }

    writeln!(out, "\nTop areas:")?;
    for (area, count) in Statistics::top(&stats.by_area, TOP_ENTRIES) {
        writeln!(out, "  {}: {}", label_or_unknown(area), count)?;
    }
    Ok(())
}

fn label_or_unknown(label: &str) -> &str {
    if label.is_empty() {
        "(unknown)"
    } else {
        label
    }
}

/// Interactive numbered menu over a `VacancyManager`
pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Gives back the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user picks "Exit" or input ends
    pub async fn run(&mut self, manager: &mut VacancyManager) -> io::Result<()> {
        writeln!(self.output, "Vacancy manager for hh.ru")?;

        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Choose an action (1-11): ")? else {
                break;
            };

            let keep_going = match choice.as_str() {
                "1" => self.search(manager).await?,
                "2" => self.add_manual(manager)?,
                "3" => {
                    let vacancies = manager.get_vacancies(&VacancyFilters::default());
                    print_vacancies(&mut self.output, &vacancies)?;
                    true
                }
                "4" => self.filter(manager)?,
                "5" => self.delete(manager)?,
                "6" => self.export(manager, ExportFormat::Xlsx)?,
                "7" => self.export(manager, ExportFormat::Csv)?,
                "8" => self.export(manager, ExportFormat::Json)?,
                "9" => {
                    print_statistics(&mut self.output, &manager.get_statistics())?;
                    true
                }
                "10" => self.clear(manager)?,
                "11" => {
                    writeln!(self.output, "Goodbye!")?;
                    break;
                }
                _ => {
                    writeln!(self.output, "Invalid choice, try again.")?;
                    true
                }
            };

            if !keep_going || self.prompt("\nPress Enter to continue...")?.is_none() {
                break;
            }
        }

        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        let rule = "=".repeat(DISPLAY_WIDTH);
        writeln!(self.output, "\n{}", rule)?;
        writeln!(self.output, "VACANCY MANAGER")?;
        writeln!(self.output, "{}", rule)?;
        writeln!(self.output, "1. Search hh.ru and add vacancies")?;
        writeln!(self.output, "2. Add a vacancy manually")?;
        writeln!(self.output, "3. Show all vacancies")?;
        writeln!(self.output, "4. Filter vacancies")?;
        writeln!(self.output, "5. Delete a vacancy")?;
        writeln!(self.output, "6. Export to Excel")?;
        writeln!(self.output, "7. Export to CSV")?;
        writeln!(self.output, "8. Export to JSON")?;
        writeln!(self.output, "9. Statistics")?;
        writeln!(self.output, "10. Clear all vacancies")?;
        writeln!(self.output, "11. Exit")?;
        writeln!(self.output, "{}", rule)
    }

    /// Prints `label` and reads one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like `prompt`, but end of input becomes an empty answer
    fn ask(&mut self, label: &str) -> io::Result<String> {
        Ok(self.prompt(label)?.unwrap_or_default())
    }

    async fn search(&mut self, manager: &mut VacancyManager) -> io::Result<bool> {
        let query = self.ask("Search query (e.g. 'Rust developer'): ")?;
        if query.is_empty() {
            writeln!(self.output, "Query must not be empty!")?;
            return Ok(true);
        }

        let default_count = manager.config().default_count;
        let max = manager.config().max_per_request;
        let count_input = self.ask(&format!(
            "Number of vacancies (default {}, max {}): ",
            default_count, max
        ))?;
        let count = count_input.parse().unwrap_or(default_count);

        writeln!(self.output, "Searching for '{}'...", query)?;
        match manager.search_and_add(&query, count).await {
            Ok(added) => writeln!(self.output, "Added {} new vacancies", added)?,
            Err(e @ VacancyError::Storage { .. }) => {
                writeln!(self.output, "Vacancies added but not saved: {}", e)?
            }
            Err(e) => writeln!(self.output, "API request failed: {}", e)?,
        }
        Ok(true)
    }

    fn add_manual(&mut self, manager: &mut VacancyManager) -> io::Result<bool> {
        let input = ManualVacancy {
            name: self.ask("Title: ")?,
            company: self.ask("Company: ")?,
            salary_from: self.ask("Salary from (optional): ")?.parse().ok(),
            salary_to: self.ask("Salary to (optional): ")?.parse().ok(),
            currency: Some(self.ask("Currency (default RUB): ")?),
            area: self.ask("Area: ")?,
            url: self.ask("URL: ")?,
            published_at: None,
            snippet: self.ask("Requirements: ")?,
            experience: self.ask("Experience: ")?,
            employment: self.ask("Employment type: ")?,
        };

        match manager.add_manual(input) {
            Ok(vacancy) => writeln!(self.output, "Vacancy added with id {}", vacancy.id)?,
            Err(e) => writeln!(self.output, "Could not add vacancy: {}", e)?,
        }
        Ok(true)
    }

    fn filter(&mut self, manager: &mut VacancyManager) -> io::Result<bool> {
        writeln!(self.output, "\nFilter vacancies (leave a field empty to skip it)")?;
        let filters = VacancyFilters {
            company: Some(self.ask("Company: ")?),
            area: Some(self.ask("Area: ")?),
            min_salary: self.ask("Minimum salary: ")?.parse().ok(),
            experience: Some(self.ask("Experience: ")?),
            employment: Some(self.ask("Employment type: ")?),
        }
        .normalized();

        let vacancies = manager.get_vacancies(&filters);
        print_vacancies(&mut self.output, &vacancies)?;
        Ok(true)
    }

    fn delete(&mut self, manager: &mut VacancyManager) -> io::Result<bool> {
        let vacancies = manager.get_vacancies(&VacancyFilters::default());
        if vacancies.is_empty() {
            writeln!(self.output, "No vacancies to delete")?;
            return Ok(true);
        }

        print_vacancies(&mut self.output, &vacancies)?;
        let answer = self.ask("\nNumber of the vacancy to delete: ")?;
        let Ok(number) = answer.parse::<usize>() else {
            writeln!(self.output, "Please enter a number!")?;
            return Ok(true);
        };

        let Some(vacancy) = number.checked_sub(1).and_then(|i| vacancies.get(i)) else {
            writeln!(self.output, "Invalid number!")?;
            return Ok(true);
        };

        match manager.delete(&vacancy.id) {
            Ok(true) => writeln!(self.output, "Vacancy deleted!")?,
            Ok(false) => writeln!(self.output, "Vacancy not found!")?,
            Err(e) => writeln!(self.output, "Vacancy deleted but not saved: {}", e)?,
        }
        Ok(true)
    }

    fn export(&mut self, manager: &VacancyManager, format: ExportFormat) -> io::Result<bool> {
        let filename = self.ask(&format!(
            "File name (default {}): ",
            format.default_filename()
        ))?;

        match manager.export(format, Some(&filename)) {
            Ok(path) => writeln!(self.output, "Exported to: {}", path.display())?,
            Err(e) => writeln!(self.output, "Export failed: {}", e)?,
        }
        Ok(true)
    }

    fn clear(&mut self, manager: &mut VacancyManager) -> io::Result<bool> {
        let confirm = self.ask("This deletes ALL vacancies. Are you sure? (y/n): ")?;
        if confirm.eq_ignore_ascii_case("y") {
            match manager.clear_all() {
                Ok(()) => writeln!(self.output, "All vacancies deleted!")?,
                Err(e) => writeln!(self.output, "Could not remove data file: {}", e)?,
            }
        } else {
            writeln!(self.output, "Cancelled")?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::Salary;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn create_test_manager() -> (VacancyManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut config = Config::with_data_dir(temp_dir.path());
        config.api_base_url = "http://127.0.0.1:9/vacancies".to_string();
        let manager = VacancyManager::new(config).expect("Manager should build");
        (manager, temp_dir)
    }

    async fn run_menu(manager: &mut VacancyManager, input: &str) -> String {
        let mut menu = Menu::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        menu.run(manager).await.expect("Menu should run");
        String::from_utf8(menu.into_output()).unwrap()
    }

    #[test]
    fn test_write_vacancy_formats_salary_and_date() {
        let mut vacancy = Vacancy::new("1", "Rust developer", "ACME");
        vacancy.salary = Some(Salary {
            from: Some(100),
            to: Some(200),
            ..Salary::default()
        });
        vacancy.published_at = "2024-03-01T12:00:00+0300".to_string();

        let mut out = Vec::new();
        write_vacancy(&mut out, 1, &vacancy).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("1. Rust developer"));
        assert!(text.contains("Salary: 100 - 200 RUB"));
        assert!(text.contains("Published: 2024-03-01\n"));
    }

    #[test]
    fn test_print_vacancies_empty() {
        let mut out = Vec::new();
        print_vacancies(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No vacancies to show\n");
    }

    #[tokio::test]
    async fn test_menu_exit() {
        let (mut manager, _temp_dir) = create_test_manager();
        let output = run_menu(&mut manager, "11\n").await;
        assert!(output.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn test_menu_stops_at_end_of_input() {
        let (mut manager, _temp_dir) = create_test_manager();
        let output = run_menu(&mut manager, "").await;
        assert!(output.contains("VACANCY MANAGER"));
    }

    #[tokio::test]
    async fn test_menu_manual_add_then_list() {
        let (mut manager, _temp_dir) = create_test_manager();
        let input = "2\nQA engineer\nACME\n50000\n\n\nМосква\n\n\n\n\n\n3\n\n11\n";

        let output = run_menu(&mut manager, input).await;

        assert!(output.contains("Vacancy added with id manual_"));
        assert!(output.contains("1. QA engineer"));
        assert!(output.contains("Salary: from 50000 RUB"));
        assert_eq!(manager.len(), 1);
    }

    #[tokio::test]
    async fn test_menu_delete_by_index() {
        let (mut manager, _temp_dir) = create_test_manager();
        manager
            .add_vacancies(vec![Vacancy::new("a", "First", "ACME"), Vacancy::new("b", "Second", "ACME")])
            .unwrap();

        let output = run_menu(&mut manager, "5\n2\n\n11\n").await;

        assert!(output.contains("Vacancy deleted!"));
        assert!(manager.get_by_id("a").is_some());
        assert!(manager.get_by_id("b").is_none());
    }

    #[tokio::test]
    async fn test_menu_delete_out_of_range() {
        let (mut manager, _temp_dir) = create_test_manager();
        manager.add_vacancies(vec![Vacancy::new("a", "First", "ACME")]).unwrap();

        let output = run_menu(&mut manager, "5\n0\n\n5\nabc\n\n11\n").await;

        assert!(output.contains("Invalid number!"));
        assert!(output.contains("Please enter a number!"));
        assert_eq!(manager.len(), 1);
    }

    #[tokio::test]
    async fn test_menu_filter_skips_blank_fields() {
        let (mut manager, _temp_dir) = create_test_manager();
        let mut moscow = Vacancy::new("1", "Moscow job", "ACME");
        moscow.area = "Москва".to_string();
        let mut kazan = Vacancy::new("2", "Kazan job", "ACME");
        kazan.area = "Казань".to_string();
        manager.add_vacancies(vec![moscow, kazan]).unwrap();

        let output = run_menu(&mut manager, "4\n\nказ\n\n\n\n\n11\n").await;

        assert!(output.contains("Kazan job"));
        assert!(!output.contains("Moscow job"));
    }

    #[tokio::test]
    async fn test_menu_clear_requires_confirmation() {
        let (mut manager, _temp_dir) = create_test_manager();
        manager.add_vacancies(vec![Vacancy::new("a", "First", "ACME")]).unwrap();

        let output = run_menu(&mut manager, "10\nn\n\n11\n").await;
        assert!(output.contains("Cancelled"));
        assert_eq!(manager.len(), 1);

        let output = run_menu(&mut manager, "10\ny\n\n11\n").await;
        assert!(output.contains("All vacancies deleted!"));
        assert!(manager.is_empty());
    }

    #[tokio::test]
    async fn test_menu_search_failure_is_reported() {
        let (mut manager, _temp_dir) = create_test_manager();

        let output = run_menu(&mut manager, "1\nrust\n10\n\n11\n").await;

        assert!(output.contains("API request failed"));
        assert!(manager.is_empty());
    }

    #[tokio::test]
    async fn test_menu_search_prompt_uses_configured_default_count() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::with_data_dir(temp_dir.path());
        config.api_base_url = "http://127.0.0.1:9/vacancies".to_string();
        config.default_count = 7;
        let mut manager = VacancyManager::new(config).unwrap();

        let output = run_menu(&mut manager, "1\nrust\n\n\n11\n").await;

        assert!(output.contains("(default 7, max 100)"));
    }

    #[tokio::test]
    async fn test_menu_export_json() {
        let (mut manager, temp_dir) = create_test_manager();
        manager.add_vacancies(vec![Vacancy::new("a", "First", "ACME")]).unwrap();

        let output = run_menu(&mut manager, "8\n\n\n11\n").await;

        assert!(output.contains("Exported to:"));
        assert!(temp_dir
            .path()
            .join("exports")
            .join("vacancies_export.json")
            .exists());
    }

    #[tokio::test]
    async fn test_menu_invalid_choice() {
        let (mut manager, _temp_dir) = create_test_manager();
        let output = run_menu(&mut manager, "42\n\n11\n").await;
        assert!(output.contains("Invalid choice"));
    }
}
