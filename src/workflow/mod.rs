pub mod loading;
pub mod propose_flow;
pub mod review_session;
pub mod reviewer;

pub use loading::{LoadingFlag, LoadingGuard};
pub use propose_flow::{AiPanel, PanelContent, Proposal, ProposeFlow};
pub use review_session::ReviewSession;
pub use reviewer::{ReviewSummary, Reviewer, ReviewerHandlers, TypePicker};
