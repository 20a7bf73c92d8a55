// Copyright 2025 The Externalized Properties Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shared one-shot expiry scheduler.
//!
//! One handle is shared across every expiring cache instead of a dedicated
//! scheduler thread per cache. Scheduled actions run as tasks on the ambient
//! tokio runtime, so `schedule` must be called from within one.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cloneable handle that schedules one-shot actions after a delay.
#[derive(Clone, Default)]
pub struct ExpiryScheduler {
    pending: Arc<AtomicUsize>,
}

impl ExpiryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay` on the shared runtime.
    pub fn schedule(&self, delay: Duration, action: impl FnOnce() + Send + 'static) {
        let pending = self.pending.clone();
        pending.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
            pending.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Number of scheduled actions that have not fired yet.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[tokio::test(start_paused = true)]
    async fn test_action_fires_after_delay() {
        let scheduler = ExpiryScheduler::new();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        scheduler.schedule(Duration::from_secs(5), move || {
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(scheduler.pending(), 0);
    }
}
