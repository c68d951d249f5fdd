//! Field-based vacancy filters
//!
//! Pure functions narrowing a slice of vacancies, plus `VacancyFilters`, the
//! typed set of optional criteria the manager applies. Every predicate is
//! evaluated per record, so applying them in any order yields the same set.

use serde::{Deserialize, Serialize};

use crate::data::Vacancy;

/// Optional filter criteria; `None` means "don't filter on this field"
///
/// Whitespace-only criteria are dropped. Other text criteria are matched
/// exactly as given, surrounding spaces included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyFilters {
    /// Case-insensitive substring of the company name
    pub company: Option<String>,
    /// Case-insensitive substring of the area name
    pub area: Option<String>,
    /// Minimum salary compared against either bound
    pub min_salary: Option<i64>,
    /// Case-insensitive substring of the experience label
    pub experience: Option<String>,
    /// Case-insensitive substring of the employment label
    pub employment: Option<String>,
}

impl VacancyFilters {
    /// Creates an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = non_blank(company.into());
        self
    }

    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = non_blank(area.into());
        self
    }

    pub fn min_salary(mut self, min_salary: i64) -> Self {
        self.min_salary = Some(min_salary);
        self
    }

    pub fn experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = non_blank(experience.into());
        self
    }

    pub fn employment(mut self, employment: impl Into<String>) -> Self {
        self.employment = non_blank(employment.into());
        self
    }

    /// Drops criteria that are empty or whitespace-only
    pub fn normalized(self) -> Self {
        Self {
            company: self.company.and_then(non_blank),
            area: self.area.and_then(non_blank),
            min_salary: self.min_salary,
            experience: self.experience.and_then(non_blank),
            employment: self.employment.and_then(non_blank),
        }
    }

    /// Whether no criterion is set
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.area.is_none()
            && self.min_salary.is_none()
            && self.experience.is_none()
            && self.employment.is_none()
    }

    /// Applies every set criterion in turn
    ///
    /// Order is company, area, min_salary, experience, employment. Each step
    /// only narrows the previous result.
    pub fn apply(&self, vacancies: &[Vacancy]) -> Vec<Vacancy> {
        let mut result = vacancies.to_vec();

        if let Some(company) = &self.company {
            result = by_company(&result, company);
        }
        if let Some(area) = &self.area {
            result = by_area(&result, area);
        }
        if let Some(min_salary) = self.min_salary {
            result = by_min_salary(&result, min_salary);
        }
        if let Some(experience) = &self.experience {
            result = by_experience(&result, experience);
        }
        if let Some(employment) = &self.employment {
            result = by_employment(&result, employment);
        }

        result
    }
}

fn non_blank(s: String) -> Option<String> {
    (!s.trim().is_empty()).then_some(s)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn by_company(vacancies: &[Vacancy], company: &str) -> Vec<Vacancy> {
    by_custom(vacancies, |v| contains_ignore_case(&v.company, company))
}

pub fn by_area(vacancies: &[Vacancy], area: &str) -> Vec<Vacancy> {
    by_custom(vacancies, |v| contains_ignore_case(&v.area, area))
}

pub fn by_experience(vacancies: &[Vacancy], experience: &str) -> Vec<Vacancy> {
    by_custom(vacancies, |v| contains_ignore_case(&v.experience, experience))
}

pub fn by_employment(vacancies: &[Vacancy], employment: &str) -> Vec<Vacancy> {
    by_custom(vacancies, |v| contains_ignore_case(&v.employment, employment))
}

/// Keeps vacancies whose lower or upper salary bound reaches `threshold`
///
/// Vacancies without a salary never match.
pub fn by_min_salary(vacancies: &[Vacancy], threshold: i64) -> Vec<Vacancy> {
    by_custom(vacancies, |v| {
        v.salary.as_ref().is_some_and(|s| {
            s.from.is_some_and(|from| from >= threshold) || s.to.is_some_and(|to| to >= threshold)
        })
    })
}

/// Keeps vacancies matching an arbitrary predicate
pub fn by_custom<F>(vacancies: &[Vacancy], predicate: F) -> Vec<Vacancy>
where
    F: Fn(&Vacancy) -> bool,
{
    vacancies.iter().filter(|v| predicate(v)).cloned().collect()
}
