pub mod app;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod evaluation;
pub mod models;
pub mod suites;
pub mod utils;
pub mod workspace;

#[cfg(test)]
pub mod test_utils;
