pub mod json_loader;

pub use json_loader::{load_draft_from_store, save_draft_to_store};
