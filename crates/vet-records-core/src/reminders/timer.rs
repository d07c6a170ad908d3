//! One-shot delayed tasks.

use std::time::Duration;

use tokio::runtime::Handle;

/// Task run when a timer fires.
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Arms one-shot timers.
///
/// Armed timers cannot be cancelled and do not survive a restart.
pub trait Timer: Send + Sync {
    fn arm(&self, delay: Duration, task: TimerTask);
}

/// Timer backed by a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioTimer {
    handle: Handle,
}

impl TokioTimer {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Timer for TokioTimer {
    fn arm(&self, delay: Duration, task: TimerTask) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_timer_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let timer = TokioTimer::new(Handle::current());

        let counter = fired.clone();
        timer.arm(
            Duration::from_secs(60),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_secs(59)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
