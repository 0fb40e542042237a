pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod server;

#[cfg(test)]
pub(crate) mod testing;
