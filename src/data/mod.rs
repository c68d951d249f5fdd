//! Core data models for the vacancies CLI
//!
//! This module contains the `Vacancy` record and its optional `Salary`, plus
//! the conversion to and from the plain JSON mapping used both by the data
//! file and by the JSON export.

pub mod hh;

pub use hh::HhClient;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, VacancyError};

/// Source tag for records fetched from hh.ru
pub const SOURCE_HH: &str = "hh.ru";

/// Source tag for records entered by the user
pub const SOURCE_MANUAL: &str = "manual";

/// Currency assumed when a salary doesn't name one
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Salary range of a vacancy
///
/// Both bounds are independently optional; nothing ties `from <= to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salary {
    /// Lower bound
    pub from: Option<i64>,
    /// Upper bound
    pub to: Option<i64>,
    /// ISO currency code (hh.ru uses "RUR" for roubles in some payloads)
    pub currency: String,
    /// Whether the amounts are before tax, if the source says
    pub gross: Option<bool>,
}

impl Default for Salary {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            currency: DEFAULT_CURRENCY.to_string(),
            gross: None,
        }
    }
}

impl Salary {
    /// Reads a salary from its mapping form
    ///
    /// `null`, a non-object or an empty object all mean "no salary".
    pub fn from_mapping(value: &Value) -> Option<Salary> {
        let map = value.as_object().filter(|m| !m.is_empty())?;
        Some(Salary {
            from: map.get("from").and_then(amount),
            to: map.get("to").and_then(amount),
            currency: map
                .get("currency")
                .and_then(scalar_to_string)
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            gross: map.get("gross").and_then(Value::as_bool),
        })
    }

    /// Human-readable range, e.g. "100000 - 150000 RUB" or "from 90000 RUB"
    pub fn display(&self) -> String {
        match (self.from, self.to) {
            (Some(from), Some(to)) => format!("{} - {} {}", from, to, self.currency),
            (Some(from), None) => format!("from {} {}", from, self.currency),
            (None, Some(to)) => format!("up to {} {}", to, self.currency),
            (None, None) => "Not specified".to_string(),
        }
    }
}

/// A single job posting, fetched from hh.ru or entered manually
///
/// Identity is `id`: two records with the same id are duplicates no matter
/// how the other fields differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: String,
    /// Job title
    pub name: String,
    pub company: String,
    pub salary: Option<Salary>,
    /// City or region name
    pub area: String,
    pub url: String,
    /// ISO-8601 publication timestamp
    pub published_at: String,
    /// Requirements excerpt
    pub snippet: String,
    pub experience: String,
    pub employment: String,
    /// `"hh.ru"` or `"manual"`
    pub source: String,
}

impl Vacancy {
    /// Creates a vacancy with the required fields and empty optional ones
    pub fn new(id: impl Into<String>, name: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            company: company.into(),
            salary: None,
            area: String::new(),
            url: String::new(),
            published_at: String::new(),
            snippet: String::new(),
            experience: String::new(),
            employment: String::new(),
            source: SOURCE_HH.to_string(),
        }
    }

    /// Converts the record to its JSON mapping form
    ///
    /// `salary` becomes a nested object or an explicit `null`.
    pub fn to_mapping(&self) -> Value {
        let salary = match &self.salary {
            Some(s) => serde_json::json!({
                "from": s.from,
                "to": s.to,
                "currency": s.currency,
                "gross": s.gross,
            }),
            None => Value::Null,
        };

        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "company": self.company,
            "salary": salary,
            "area": self.area,
            "url": self.url,
            "published_at": self.published_at,
            "snippet": self.snippet,
            "experience": self.experience,
            "employment": self.employment,
            "source": self.source,
        })
    }

    /// Rebuilds a record from its JSON mapping form
    ///
    /// `id`, `name` and `company` are required. Scalars are coerced to
    /// strings, so a numeric `id` is accepted. Absent optional fields become
    /// empty strings and `source` defaults to `"hh.ru"`.
    ///
    /// # Returns
    /// * `Ok(Vacancy)` when the required fields are present
    /// * `Err(VacancyError::MissingField)` naming the first missing field
    pub fn from_mapping(value: &Value) -> Result<Vacancy> {
        let map = value
            .as_object()
            .ok_or_else(|| VacancyError::MissingField("id".to_string()))?;

        Ok(Vacancy {
            id: required(map, "id")?,
            name: required(map, "name")?,
            company: required(map, "company")?,
            salary: map.get("salary").and_then(Salary::from_mapping),
            area: optional(map, "area"),
            url: optional(map, "url"),
            published_at: optional(map, "published_at"),
            snippet: optional(map, "snippet"),
            experience: optional(map, "experience"),
            employment: optional(map, "employment"),
            source: map
                .get("source")
                .and_then(scalar_to_string)
                .unwrap_or_else(|| SOURCE_HH.to_string()),
        })
    }

    /// Whether this record was entered by the user
    pub fn is_manual(&self) -> bool {
        self.source == SOURCE_MANUAL
    }
}

/// Converts a JSON scalar to a string; `null`, arrays and objects give `None`
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a salary bound: integers as-is, floats truncated, numeric strings parsed
fn amount(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn required(map: &Map<String, Value>, key: &str) -> Result<String> {
    map.get(key)
        .and_then(scalar_to_string)
        .ok_or_else(|| VacancyError::MissingField(key.to_string()))
}

fn optional(map: &Map<String, Value>, key: &str) -> String {
    map.get(key).and_then(scalar_to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_vacancy() -> Vacancy {
        Vacancy {
            id: "93421187".to_string(),
            name: "Python-разработчик".to_string(),
            company: "Яндекс".to_string(),
            salary: Some(Salary {
                from: Some(150000),
                to: Some(250000),
                currency: "RUR".to_string(),
                gross: Some(false),
            }),
            area: "Москва".to_string(),
            url: "https://hh.ru/vacancy/93421187".to_string(),
            published_at: "2024-03-01T12:00:00+0300".to_string(),
            snippet: "Опыт работы с Django".to_string(),
            experience: "От 1 года до 3 лет".to_string(),
            employment: "Полная занятость".to_string(),
            source: SOURCE_HH.to_string(),
        }
    }

    #[test]
    fn test_mapping_roundtrip_with_salary() {
        let vacancy = sample_vacancy();
        let restored = Vacancy::from_mapping(&vacancy.to_mapping()).expect("Should parse");
        assert_eq!(restored, vacancy);
    }

    #[test]
    fn test_mapping_roundtrip_without_salary() {
        let mut vacancy = Vacancy::new("manual_1", "Tester", "ACME");
        vacancy.source = SOURCE_MANUAL.to_string();
        let restored = Vacancy::from_mapping(&vacancy.to_mapping()).expect("Should parse");
        assert_eq!(restored, vacancy);
    }

    #[test]
    fn test_to_mapping_writes_null_salary() {
        let vacancy = Vacancy::new("1", "Dev", "ACME");
        let mapping = vacancy.to_mapping();
        assert!(mapping["salary"].is_null());
        assert_eq!(mapping["source"], "hh.ru");
    }

    #[test]
    fn test_to_mapping_nests_salary() {
        let mapping = sample_vacancy().to_mapping();
        assert_eq!(mapping["salary"]["from"], 150000);
        assert_eq!(mapping["salary"]["to"], 250000);
        assert_eq!(mapping["salary"]["currency"], "RUR");
        assert_eq!(mapping["salary"]["gross"], false);
    }

    #[test]
    fn test_from_mapping_defaults_optional_fields() {
        let vacancy = Vacancy::from_mapping(&json!({
            "id": "7",
            "name": "Dev",
            "company": "ACME"
        }))
        .expect("Should parse");

        assert_eq!(vacancy.area, "");
        assert_eq!(vacancy.url, "");
        assert_eq!(vacancy.snippet, "");
        assert_eq!(vacancy.source, "hh.ru");
        assert!(vacancy.salary.is_none());
    }

    #[test]
    fn test_from_mapping_coerces_numeric_id() {
        let vacancy = Vacancy::from_mapping(&json!({
            "id": 12345,
            "name": "Dev",
            "company": "ACME",
            "area": 1
        }))
        .expect("Should parse");

        assert_eq!(vacancy.id, "12345");
        assert_eq!(vacancy.area, "1");
    }

    #[test]
    fn test_from_mapping_missing_company_fails() {
        let result = Vacancy::from_mapping(&json!({"id": "1", "name": "Dev"}));
        match result {
            Err(VacancyError::MissingField(field)) => assert_eq!(field, "company"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_from_mapping_null_id_is_missing() {
        let result = Vacancy::from_mapping(&json!({"id": null, "name": "Dev", "company": "A"}));
        assert!(matches!(result, Err(VacancyError::MissingField(f)) if f == "id"));
    }

    #[test]
    fn test_from_mapping_rejects_non_object() {
        assert!(Vacancy::from_mapping(&json!(["id", "name"])).is_err());
    }

    #[test]
    fn test_salary_from_mapping_defaults_currency() {
        let salary = Salary::from_mapping(&json!({"from": 1000})).expect("Should parse");
        assert_eq!(salary.from, Some(1000));
        assert_eq!(salary.to, None);
        assert_eq!(salary.currency, "RUB");
        assert_eq!(salary.gross, None);
    }

    #[test]
    fn test_salary_from_mapping_empty_object_is_none() {
        assert!(Salary::from_mapping(&json!({})).is_none());
        assert!(Salary::from_mapping(&Value::Null).is_none());
    }

    #[test]
    fn test_salary_amount_truncates_floats() {
        let salary = Salary::from_mapping(&json!({"from": 1500.9, "to": "2000"})).unwrap();
        assert_eq!(salary.from, Some(1500));
        assert_eq!(salary.to, Some(2000));
    }

    #[test]
    fn test_salary_display() {
        let mut salary = Salary {
            from: Some(100),
            to: Some(200),
            ..Salary::default()
        };
        assert_eq!(salary.display(), "100 - 200 RUB");
        salary.to = None;
        assert_eq!(salary.display(), "from 100 RUB");
        salary.from = None;
        salary.to = Some(300);
        assert_eq!(salary.display(), "up to 300 RUB");
        salary.to = None;
        assert_eq!(salary.display(), "Not specified");
    }

    #[test]
    fn test_serde_shape_matches_mapping() {
        let vacancy = sample_vacancy();
        let via_serde = serde_json::to_value(&vacancy).expect("Should serialize");
        assert_eq!(via_serde, vacancy.to_mapping());
    }
}
