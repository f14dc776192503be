//! 加载状态标志
//!
//! 置位后返回一个守卫，守卫释放时无条件复位，
//! 成功、失败、出错或 panic 都不会让标志卡在 `true`。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct LoadingFlag {
    inner: Arc<AtomicBool>,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }

    /// 置位并返回复位守卫
    #[must_use = "守卫释放时才会复位加载标志"]
    pub fn begin(&self) -> LoadingGuard {
        self.inner.store(true, Ordering::SeqCst);
        LoadingGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[derive(Debug)]
pub struct LoadingGuard {
    inner: Arc<AtomicBool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.inner.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_resets() {
        let flag = LoadingFlag::new();
        assert!(!flag.is_loading());
        {
            let _guard = flag.begin();
            assert!(flag.is_loading());
        }
        assert!(!flag.is_loading());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = LoadingFlag::new();
        let observer = flag.clone();
        let guard = flag.begin();
        assert!(observer.is_loading());
        drop(guard);
        assert!(!observer.is_loading());
    }

    #[test]
    fn test_resets_on_panic() {
        let flag = LoadingFlag::new();
        let inner = flag.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = inner.begin();
            panic!("boom");
        });

        assert!(result.is_err());
        assert!(!flag.is_loading());
    }
}
