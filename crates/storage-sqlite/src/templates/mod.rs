//! Prompt template persistence.

pub mod model;
pub mod repository;

pub use model::{NewPromptTemplate, PromptTemplateDB, PromptTemplateRecord, MAX_TEMPLATE_NAME_CHARS};
pub use repository::PromptTemplateRepository;
