//! End-to-end tests for the store and manager against real files

use std::fs;

use tempfile::TempDir;
use vacancies::config::Config;
use vacancies::data::Vacancy;
use vacancies::filter::VacancyFilters;
use vacancies::manager::VacancyManager;
use vacancies::store::Store;

fn create_test_manager(temp_dir: &TempDir) -> VacancyManager {
    let mut config = Config::with_data_dir(temp_dir.path());
    config.api_base_url = "http://127.0.0.1:9/vacancies".to_string();
    VacancyManager::new(config).expect("Manager should build")
}

#[test]
fn test_add_delete_clear_flow() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = create_test_manager(&temp_dir);

    let added = manager
        .add_vacancies(vec![Vacancy::new("1", "A", "X"), Vacancy::new("2", "B", "Y")])
        .unwrap();
    assert_eq!(added, 2);

    let added = manager
        .add_vacancies(vec![Vacancy::new("1", "A", "X"), Vacancy::new("3", "C", "Z")])
        .unwrap();
    assert_eq!(added, 1);
    assert_eq!(manager.len(), 3);

    assert!(manager.delete("2").unwrap());
    assert_eq!(manager.len(), 2);

    manager.clear_all().unwrap();
    assert_eq!(manager.len(), 0);
    assert!(!manager.config().data_file.exists());
}

#[test]
fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut manager = create_test_manager(&temp_dir);
        manager
            .add_vacancies(vec![Vacancy::new("1", "A", "X"), Vacancy::new("2", "B", "Y")])
            .unwrap();
        manager.delete("1").unwrap();
    }

    let mut manager = create_test_manager(&temp_dir);
    let ids: Vec<String> = manager
        .get_vacancies(&VacancyFilters::default())
        .into_iter()
        .map(|v| v.id)
        .collect();
    assert_eq!(ids, vec!["2"]);
}

#[test]
fn test_corrupted_file_loads_empty_and_is_replaced() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("vacancies.json");
    fs::write(&path, "{ not json").unwrap();

    let mut store = Store::open(&path);
    assert!(store.is_empty());

    store.add_many(vec![Vacancy::new("1", "A", "X")]).unwrap();

    let reopened = Store::open(&path);
    assert_eq!(reopened.len(), 1);
}

#[test]
fn test_bad_elements_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("vacancies.json");
    fs::write(
        &path,
        r#"[{"id": "1", "name": "A", "company": "X"}, {"name": "no id"}, 42]"#,
    )
    .unwrap();

    let store = Store::open(&path);

    assert_eq!(store.len(), 1);
    assert!(store.contains("1"));
}
