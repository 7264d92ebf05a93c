pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod logging;
pub mod router;
pub mod store;
pub mod terminal;
pub mod worker;
