//! A local ledger of donors and their donations.
//!
//! Donations live in a SQLite database under the donations home directory. [`Db`] is the record
//! store, [`validate`] holds the rules a new donation must satisfy, [`editor::DonationEditor`]
//! moves a single record between viewing and editing, and [`view::ListView`] keeps a list of
//! donations current as the store changes.

pub mod args;
pub mod commands;
mod config;
pub mod db;
pub mod editor;
mod error;
pub mod model;
mod utils;
pub mod validate;
pub mod view;


pub use config::Config;
pub use db::Db;
pub use error::Error;
pub use error::Result;
