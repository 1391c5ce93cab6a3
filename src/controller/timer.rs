// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cancelable scheduled tasks.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Token for a callback scheduled to run once after a delay.
///
/// Dropping the token does not cancel the callback.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Runs `callback` on `runtime` after `delay`.
    pub fn schedule<F>(runtime: &Handle, delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        Self { task }
    }

    /// Cancels the callback if it has not started yet.
    ///
    /// A callback that already started runs to completion, so owners that
    /// need a hard guarantee must also check a generation of their own.
    pub fn cancel(self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let f = fired.clone();
        let _timer = TimerHandle::schedule(&Handle::current(), Duration::from_millis(500), move || {
            f.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_callback() {
        let fired = Arc::new(AtomicBool::new(false));
        let f = fired.clone();
        let timer = TimerHandle::schedule(&Handle::current(), Duration::from_millis(100), move || {
            f.store(true, Ordering::SeqCst);
        });

        timer.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
