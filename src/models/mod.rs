pub mod draft;
pub mod generation;
pub mod loaders;
pub mod question;
pub mod review;

pub use draft::{Distribution, ExamDraft};
pub use generation::{GenerationData, GenerationResult, QuestionItem, QuestionSet};
pub use loaders::{load_draft_from_store, save_draft_to_store};
pub use question::{GeneratedQuestion, QuestionType};
pub use review::ReviewHeader;
