pub mod catalog;
pub mod config;
pub mod error;
pub mod fallback;
pub mod feed;
pub mod fetch;
pub mod flights;
pub mod i18n;
pub mod model;
pub mod output;
pub mod service;
pub mod stats;
pub mod weather;
