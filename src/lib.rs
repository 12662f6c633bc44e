pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod display;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod templates_structs;
pub mod validate;
