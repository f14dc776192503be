//! # Exam AI Propose
//!
//! 按草稿的题型分布调用 AI 生成试卷题目，并提供审阅页的统计与动作分发
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 草稿、生成题目、生成结果、审阅页头部
//! - `ExamDraft` - 科目 + 题目总数 + 四类题型分布
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - 描述"我能做什么"，彼此独立
//! - `validate_distribution` - 题型分布校验
//! - `QuestionStats` - 题目统计
//! - `RenderedSet` / `HtmlRenderer` - 渲染树与 HTML 输出
//! - `ToastQueue` - 用户通知通道
//! - `JsonDraftStore` - 本地草稿来源
//! - `clients/` - 生成接口（HTTP 后端或 LLM）
//!
//! ### ③ 流程层（Workflow）
//! - `ProposeFlow` - 出题流程（草稿 → 校验 → 生成 → 渲染）
//! - `Reviewer` - 审阅页动作分发（重新生成 / 手动添加 / 保存）
//! - `ReviewSession` - 审阅页处理器的默认实现
//!
//! ### ④ 应用层
//! - `App` - 串联配置、存储、生成接口和流程
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, RunReport};
pub use clients::{HttpGenerationClient, QuestionGenerator};
pub use config::Config;
pub use error::{AppError, AppResult, ProposeError};
pub use models::{ExamDraft, GeneratedQuestion, GenerationResult, QuestionSet, QuestionType};
pub use services::{QuestionStats, ToastQueue};
pub use workflow::{ProposeFlow, ReviewSession, Reviewer, ReviewerHandlers};
