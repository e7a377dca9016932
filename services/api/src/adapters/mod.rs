pub mod db;
pub mod openai_client;
pub mod openai_llm;
pub mod payload;
pub mod provider_error;
pub mod sst;

pub use db::DbAdapter;
pub use openai_client::openai_client;
pub use openai_llm::OpenAiTextAdapter;
pub use sst::OpenAiSstAdapter;
