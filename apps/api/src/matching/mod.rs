pub mod batch;
pub mod enhancement;
pub mod handlers;
pub mod prompts;
pub mod scorer;
pub mod store;
