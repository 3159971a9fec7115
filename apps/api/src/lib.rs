pub mod config;
pub mod errors;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod rate_limit;
pub mod resume;
pub mod routes;
pub mod state;
