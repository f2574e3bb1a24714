pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod images;
pub mod models;
pub mod pagination;
pub mod query;
pub mod session;
pub mod tmdb;
pub mod view;
