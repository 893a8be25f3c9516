//! Business logic services
//!
//! Constructed once at startup with injected repositories, policy and
//! clock; shared through the application state.

pub mod catalog_service;
pub mod fine_service;
pub mod loan_service;

pub use catalog_service::CatalogService;
pub use fine_service::FineEngine;
pub use loan_service::LoanService;
