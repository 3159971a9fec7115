pub mod document;
pub mod facts;
pub mod handlers;
pub mod vocabulary;
