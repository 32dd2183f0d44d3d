//! Owned Task Handles
//!
//! Every delayed transition and every in-flight fetch lives in a
//! [`TaskSlot`] on the sequencer. Replacing, cancelling or dropping the slot
//! aborts the task, so nothing scheduled for an old cycle outlives it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::SequencerEvent;

/// Slot holding at most one spawned task; aborts it on drop
#[derive(Debug, Default)]
pub(crate) struct TaskSlot {
    task: Option<JoinHandle<()>>,
}

impl TaskSlot {
    /// Put a task in the slot, aborting whatever was there
    pub(crate) fn replace(&mut self, task: JoinHandle<()>) {
        self.cancel();
        self.task = Some(task);
    }

    /// Abort the task in the slot; returns whether one was pending
    pub(crate) fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    /// Forget a task whose event has been handled
    pub(crate) fn clear(&mut self) {
        self.task = None;
    }

    /// Whether a task is waiting to be handled
    pub(crate) fn is_pending(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Post `event` to the sequencer queue after `delay`
pub(crate) fn schedule(
    delay: Duration,
    tx: mpsc::UnboundedSender<SequencerEvent>,
    event: SequencerEvent,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        // Receiver gone means the sequencer was dropped
        let _ = tx.send(event);
    })
}
