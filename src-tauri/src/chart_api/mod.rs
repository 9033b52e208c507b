pub mod types;
pub mod patterns;
pub mod result_parser;
pub mod prompts;
pub mod image_utils;
pub mod http_client;
pub mod llm_client;
pub mod analysis;

pub use types::*;
pub use patterns::PatternCatalog;
pub use result_parser::*;
pub use image_utils::load_preview;
pub use llm_client::ModelClient;
pub use analysis::*;
