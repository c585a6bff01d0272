// Library for tests to access modules

pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod routes;
pub mod topology;
pub mod worker;
