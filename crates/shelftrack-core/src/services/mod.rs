//! Shared service wrappers used across clients.

mod database;

pub use database::DatabaseService;
