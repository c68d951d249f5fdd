//! Vacancy manager: the operation set behind the CLI and the menu
//!
//! Composes the store, the hh.ru client, the filters, the filter-result
//! cache and the exporters.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Local, Utc};
use log::{error, info, warn};

use crate::cache::Cache;
use crate::config::Config;
use crate::data::{HhClient, Salary, Vacancy, DEFAULT_CURRENCY, SOURCE_MANUAL};
use crate::error::{Result, VacancyError};
use crate::export::{self, ExportFormat};
use crate::filter::VacancyFilters;
use crate::store::Store;

/// User-entered vacancy details
#[derive(Debug, Clone, Default)]
pub struct ManualVacancy {
    pub name: String,
    pub company: String,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    /// Defaults to RUB
    pub currency: Option<String>,
    pub area: String,
    pub url: String,
    /// Defaults to the current local time
    pub published_at: Option<String>,
    pub snippet: String,
    pub experience: String,
    pub employment: String,
}

/// Aggregate counts over the stored vacancies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    /// Vacancies that carry a salary
    pub with_salary: usize,
    pub by_company: BTreeMap<String, usize>,
    pub by_area: BTreeMap<String, usize>,
    pub by_experience: BTreeMap<String, usize>,
    pub by_employment: BTreeMap<String, usize>,
    pub by_source: BTreeMap<String, usize>,
}

impl Statistics {
    /// Computes statistics over `vacancies`
    pub fn from_vacancies(vacancies: &[Vacancy]) -> Self {
        let mut stats = Statistics {
            total: vacancies.len(),
            ..Statistics::default()
        };

        for v in vacancies {
            if v.salary.is_some() {
                stats.with_salary += 1;
            }
            *stats.by_company.entry(v.company.clone()).or_default() += 1;
            *stats.by_area.entry(v.area.clone()).or_default() += 1;
            *stats.by_experience.entry(v.experience.clone()).or_default() += 1;
            *stats.by_employment.entry(v.employment.clone()).or_default() += 1;
            *stats.by_source.entry(v.source.clone()).or_default() += 1;
        }

        stats
    }

    /// The `n` most frequent values of a table, most frequent first
    ///
    /// Equal counts are ordered by value.
    pub fn top(table: &BTreeMap<String, usize>, n: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> =
            table.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}

/// Facade over storage, fetching, filtering and exporting
pub struct VacancyManager {
    config: Config,
    store: Store,
    client: HhClient,
    /// Filter results keyed by the serialized filters
    filter_cache: Cache<Vec<Vacancy>>,
}

impl VacancyManager {
    /// Opens the data file named in `config` and builds an hh.ru client
    pub fn new(config: Config) -> Result<Self> {
        let store = Store::open(&config.data_file);
        let client = HhClient::new(&config)?;
        let filter_cache = Cache::new(config.cache_capacity, config.cache_ttl);
        Ok(Self::with_parts(config, store, client, filter_cache))
    }

    /// Assembles a manager from explicitly constructed parts
    pub fn with_parts(
        config: Config,
        store: Store,
        client: HhClient,
        filter_cache: Cache<Vec<Vacancy>>,
    ) -> Self {
        Self {
            config,
            store,
            client,
            filter_cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Searches hh.ru and stores the new results
    ///
    /// `count` is clamped to `1..=max_per_request`.
    ///
    /// # Returns
    /// * `Ok(n)` - Number of vacancies not seen before
    /// * `Err(Network | Http | Parse)` - The search failed; nothing was stored
    /// * `Err(Storage)` - Results were added in memory but not written to disk
    pub async fn search_and_add(&mut self, query: &str, count: usize) -> Result<usize> {
        let query = query.trim();
        if query.is_empty() {
            return Err(VacancyError::InvalidInput(
                "search query must not be empty".to_string(),
            ));
        }

        let per_page = self.config.clamp_count(count);
        info!("Searching hh.ru for {:?} ({} per page)", query, per_page);

        let vacancies = self
            .client
            .search_vacancies(query, self.config.default_area, per_page, 0)
            .await
            .inspect_err(|e| error!("hh.ru search for {:?} failed: {}", query, e))?;

        let added = self.add_vacancies(vacancies)?;
        info!("Added {} new vacancies for {:?}", added, query);
        Ok(added)
    }

    /// Stores vacancies, skipping ids already present
    pub fn add_vacancies(&mut self, vacancies: Vec<Vacancy>) -> Result<usize> {
        self.filter_cache.clear();
        self.store.add_many(vacancies)
    }

    /// Stores a user-entered vacancy under a synthetic `manual_` id
    pub fn add_manual(&mut self, input: ManualVacancy) -> Result<Vacancy> {
        let name = input.name.trim();
        let company = input.company.trim();
        if name.is_empty() {
            return Err(VacancyError::InvalidInput("title must not be empty".to_string()));
        }
        if company.is_empty() {
            return Err(VacancyError::InvalidInput("company must not be empty".to_string()));
        }

        let salary = (input.salary_from.is_some() || input.salary_to.is_some()).then(|| Salary {
            from: input.salary_from,
            to: input.salary_to,
            currency: input
                .currency
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            gross: None,
        });

        let vacancy = Vacancy {
            id: self.manual_id(),
            name: name.to_string(),
            company: company.to_string(),
            salary,
            area: input.area,
            url: input.url,
            published_at: input
                .published_at
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()),
            snippet: input.snippet,
            experience: input.experience,
            employment: input.employment,
            source: SOURCE_MANUAL.to_string(),
        };

        self.add_vacancies(vec![vacancy.clone()])?;
        info!("Added manual vacancy {}", vacancy.id);
        Ok(vacancy)
    }

    /// Returns stored vacancies narrowed by `filters`
    ///
    /// Results are memoized until the next mutation or until the cache TTL runs out.
    pub fn get_vacancies(&mut self, filters: &VacancyFilters) -> Vec<Vacancy> {
        if filters.is_empty() {
            return self.store.get_all();
        }

        let key = match serde_json::to_string(filters) {
            Ok(key) => key,
            Err(e) => {
                warn!("Cannot build cache key for filters: {}", e);
                return filters.apply(&self.store.get_all());
            }
        };

        if let Some(cached) = self.filter_cache.get(&key) {
            return cached;
        }

        let filtered = filters.apply(&self.store.get_all());
        self.filter_cache.set(key, filtered.clone());
        filtered
    }

    pub fn get_by_id(&self, id: &str) -> Option<Vacancy> {
        self.store.get_by_id(id)
    }

    /// Deletes a vacancy by id; `Ok(false)` when it isn't stored
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        self.filter_cache.clear();
        self.store.delete(id)
    }

    /// Deletes every vacancy and the data file
    pub fn clear_all(&mut self) -> Result<()> {
        self.filter_cache.clear();
        self.store.clear_all()
    }

    /// Exports all stored vacancies into the exports directory
    ///
    /// `filename` falls back to the format's default name.
    pub fn export(&self, format: ExportFormat, filename: Option<&str>) -> Result<PathBuf> {
        let vacancies = self.store.get_all();
        if vacancies.is_empty() {
            return Err(VacancyError::NothingToExport);
        }

        let path = self.config.exports_dir.join(format.filename(filename));
        if path == self.config.data_file {
            return Err(VacancyError::InvalidInput(format!(
                "export would overwrite the data file {}",
                path.display()
            )));
        }
        export::export(&vacancies, format, &path)
            .inspect_err(|e| error!("{} export failed: {}", format.extension(), e))
    }

    pub fn get_statistics(&self) -> Statistics {
        Statistics::from_vacancies(&self.store.get_all())
    }

    fn manual_id(&self) -> String {
        let now = Utc::now();
        let base = format!("manual_{}.{:06}", now.timestamp(), now.timestamp_subsec_micros());
        let mut id = base.clone();
        let mut suffix = 1;
        while self.store.contains(&id) {
            id = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        id
    }
}
