//! hh.ru vacancy search API client
//!
//! This module fetches vacancies from the public hh.ru search endpoint and
//! maps the JSON payload into `Vacancy` records. Items that cannot be mapped
//! are logged and skipped; the rest of the page is kept.

use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde_json::Value;

use super::{scalar_to_string, Salary, Vacancy, SOURCE_HH};
use crate::config::Config;
use crate::error::{Result, VacancyError};

/// Client for the hh.ru vacancy search API
#[derive(Debug, Clone)]
pub struct HhClient {
    client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl HhClient {
    /// Creates a client with the timeout and User-Agent from the configuration
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.api_user_agent)
                .map_err(|e| VacancyError::InvalidInput(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.api_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Creates a client pointed at a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Searches vacancies
    ///
    /// # Arguments
    /// * `query` - Free-text search query
    /// * `area` - hh.ru area code (113 is Russia)
    /// * `per_page` - Page size
    /// * `page` - Zero-based page index
    ///
    /// # Returns
    /// * `Ok(Vec<Vacancy>)` - Every item that could be mapped
    /// * `Err(VacancyError::Network)` - Transport failure
    /// * `Err(VacancyError::Http)` - Non-success status code
    /// * `Err(VacancyError::Parse)` - Body isn't JSON
    pub async fn search_vacancies(
        &self,
        query: &str,
        area: u32,
        per_page: usize,
        page: usize,
    ) -> Result<Vec<Vacancy>> {
        debug!(
            "GET {} text={:?} area={} per_page={} page={}",
            self.base_url, query, area, per_page, page
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("text", query.to_string()),
                ("area", area.to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VacancyError::Http {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let text = response.text().await?;
        let payload: Value = serde_json::from_str(&text)?;
        let vacancies = parse_vacancies(&payload);

        info!("hh.ru returned {} vacancies for {:?}", vacancies.len(), query);
        Ok(vacancies)
    }
}

/// Maps a search response payload into vacancies
///
/// A payload without an `items` array yields no vacancies.
pub fn parse_vacancies(payload: &Value) -> Vec<Vacancy> {
    let Some(items) = payload.get("items").and_then(Value::as_array) else {
        warn!("hh.ru response has no items array");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match parse_vacancy_item(item) {
            Ok(vacancy) => Some(vacancy),
            Err(e) => {
                let id = item.get("id").and_then(scalar_to_string);
                warn!("Skipping vacancy {}: {}", id.as_deref().unwrap_or("<no id>"), e);
                None
            }
        })
        .collect()
}

/// Maps a single API item
///
/// `id`, `name` and `employer.name` are required; everything else falls
/// back to an empty string.
pub fn parse_vacancy_item(item: &Value) -> Result<Vacancy> {
    let required = |path: &[&str]| {
        lookup(item, path)
            .and_then(scalar_to_string)
            .ok_or_else(|| VacancyError::MissingField(path.join(".")))
    };
    let optional = |path: &[&str]| {
        lookup(item, path)
            .and_then(scalar_to_string)
            .unwrap_or_default()
    };

    Ok(Vacancy {
        id: required(&["id"])?,
        name: required(&["name"])?,
        company: required(&["employer", "name"])?,
        salary: item.get("salary").and_then(Salary::from_mapping),
        area: optional(&["area", "name"]),
        url: optional(&["alternate_url"]),
        published_at: optional(&["published_at"]),
        snippet: optional(&["snippet", "requirement"]),
        experience: optional(&["experience", "name"]),
        employment: optional(&["employment", "name"]),
        source: SOURCE_HH.to_string(),
    })
}

/// Follows a chain of object keys
fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}
