//! # Domain Module
//!
//! Business logic of the demo bank.
//!
//! - **models**: customers, accounts and transactions, exportable as CSV
//! - **bank_service**: record creation and the rules attached to it
//! - **events**: handlers run after a record is saved (balance updates)
//! - **populate**: sample data for a fresh database

pub mod bank_service;
pub mod events;
pub mod models;
pub mod populate;

pub use bank_service::BankService;
pub use populate::populate_sample_data;
