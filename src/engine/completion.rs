// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use tokio::sync::watch;

/// Waits for a fixed number of independent completion signals.
///
/// Success and failure count alike. Signals are handed out as
/// [`CompletionSignal`] values; a signal dropped without firing releases the
/// waiter once no signal is left, so a lost task cannot hang the run.
pub struct CompletionTracker {
    expected: usize,
    sender: Arc<watch::Sender<usize>>,
    receiver: watch::Receiver<usize>,
}

impl CompletionTracker {
    pub fn new(expected: usize) -> Self {
        let (sender, receiver) = watch::channel(0);
        Self {
            expected,
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn signal(&self) -> CompletionSignal {
        CompletionSignal {
            sender: self.sender.clone(),
        }
    }

    /// Resolves once `expected` signals have fired.
    ///
    /// Returns `false` when every signal was dropped before enough of them
    /// fired. Resolves immediately when nothing is expected.
    pub async fn wait(self) -> bool {
        let CompletionTracker {
            expected,
            sender,
            mut receiver,
        } = self;
        if expected == 0 {
            return true;
        }
        drop(sender);

        // wait_for re-checks the predicate on every change, so spurious wakes are harmless
        let result = receiver.wait_for(|completed| *completed >= expected).await;
        result.is_ok()
    }
}

pub struct CompletionSignal {
    sender: Arc<watch::Sender<usize>>,
}

impl CompletionSignal {
    pub fn complete(self) {
        self.sender.send_modify(|completed| *completed += 1);
    }
}
