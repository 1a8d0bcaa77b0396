// Report generation, HTML/PDF document export and saved-report storage.

pub mod document;
pub mod handlers;
pub mod prompts;
pub mod store;
pub mod templates;
