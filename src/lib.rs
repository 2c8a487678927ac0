//! Bank Account Service
//!
//! A REST API for creating, reading and deleting bank accounts, fronted by
//! signed account tokens.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: HS256 JWT in the `x-jwt-token` header, bound to an account number
//! - **Passwords**: bcrypt, hashed on the blocking thread pool
//! - **Format**: JSON requests/responses

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
