//! Product catalog HTTP service: product CRUD, search and filtering, and
//! embedded reviews with a derived average rating.

pub mod auth;
pub mod config;
pub mod database;
pub mod dtos;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
