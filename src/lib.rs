pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod middleware;
pub mod notifier;
pub mod routes;
pub mod services;
pub mod state;
pub mod testing;
pub mod types;
