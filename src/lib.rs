//! Vacancies library
//!
//! Collects hh.ru job vacancies into a local JSON store, filters them and
//! exports them. The binary is a thin layer over [`manager::VacancyManager`].

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod manager;
pub mod menu;
pub mod store;

pub use error::{Result, VacancyError};
