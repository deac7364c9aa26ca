pub mod app;
pub mod jwt;
pub mod models;
