//! Database layer for Fieldlog

mod connection;
mod migrations;

pub use connection::Database;
