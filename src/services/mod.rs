pub mod counter;
pub mod draft_store;
pub mod llm_service;
pub mod notifier;
pub mod render;
pub mod validator;

pub use counter::QuestionStats;
pub use draft_store::{resolve_draft, DraftSource, JsonDraftStore, MemoryDraftStore};
pub use llm_service::LlmService;
pub use notifier::{Notifier, Severity, Toast, ToastQueue};
pub use render::{escape_html, HtmlRenderer, PlainTextRenderer, RenderedSet, Renderer};
pub use validator::validate_distribution;
