//! 用户通知通道 - 业务能力层
//!
//! 只传递给人看的文本，不携带结构化错误码

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{error, warn};

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Error,
}

/// 一条通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
}

/// 通知通道
pub trait Notifier: Send + Sync {
    fn push(&self, severity: Severity, message: &str);
}

/// 内存中的临时通知队列
///
/// 推送的同时写入日志，由界面层按需取走或按 id 关闭。
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Mutex<VecDeque<Toast>>,
    next_id: AtomicU64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前所有通知（不移除）
    pub fn snapshot(&self) -> Vec<Toast> {
        self.lock().iter().cloned().collect()
    }

    /// 取走全部通知
    pub fn drain(&self) -> Vec<Toast> {
        self.lock().drain(..).collect()
    }

    /// 关闭指定通知，返回是否存在
    pub fn remove(&self, id: u64) -> bool {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Toast>> {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Notifier for ToastQueue {
    fn push(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Warn => warn!("⚠️ {}", message),
            Severity::Error => error!("❌ {}", message),
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.lock().push_back(Toast {
            id,
            severity,
            message: message.to_string(),
        });
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn push(&self, severity: Severity, message: &str) {
        (**self).push(severity, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain() {
        let queue = ToastQueue::new();
        queue.push(Severity::Warn, "先保存表单");
        queue.push(Severity::Error, "生成失败");

        assert_eq!(queue.len(), 2);
        let toasts = queue.drain();
        assert_eq!(toasts[0].severity, Severity::Warn);
        assert_eq!(toasts[1].message, "生成失败");
        assert_ne!(toasts[0].id, toasts[1].id);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_remove_by_id() {
        let queue = ToastQueue::new();
        queue.push(Severity::Error, "a");
        queue.push(Severity::Error, "b");

        let first = queue.snapshot()[0].id;
        assert!(queue.remove(first));
        assert!(!queue.remove(first));
        assert_eq!(queue.snapshot().len(), 1);
        assert_eq!(queue.snapshot()[0].message, "b");
    }
}
