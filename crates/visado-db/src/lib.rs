//! Visado Database Library
//!
//! Postgres repositories for users, visa applications, and documents, plus
//! pool setup and migrations.

pub mod db;

pub use db::{setup_database, ApplicationRepository, DocumentRepository, UserRepository};
