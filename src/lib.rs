//! FinTrack - personal finance tracking with tax-ready spreadsheet export
//!
//! Records incomes, expenses, bill reminders and savings for a guest or an
//! authenticated user, and exports them as an ITR or GST workbook.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Record models, identities and collections
//! - `storage`: JSON file storage layer
//! - `feed`: Snapshot feeds between gateways and the record store
//! - `gateway`: Local and remote record backends, attachment stores
//! - `store`: The record store the CLI works against
//! - `export`: Date windows, aggregation and the xlsx workbook builder
//! - `dashboard`: Totals and recent activity
//! - `audit`: Audit logging system
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::config::{FintrackPaths, Settings};
//! use fintrack::gateway::open_gateway;
//! use fintrack::models::Identity;
//! use fintrack::store::RecordStore;
//!
//! let paths = FintrackPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let gateway = open_gateway(&paths, &settings, Identity::Guest, None)?;
//! let store = RecordStore::open(gateway)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod export;
pub mod feed;
pub mod gateway;
pub mod models;
pub mod storage;
pub mod store;

pub use error::{FintrackError, FintrackResult};
