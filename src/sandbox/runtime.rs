//! Isolated execution runtime abstraction
//!
//! A runtime launches a guest program in a context that shares nothing with
//! the host. The only way back is the instance's message channel, which
//! delivers messages in the order the guest produced them.

use super::log::LogLevel;
use crate::error::ClassroomResult;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Message received from a running guest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestMessage {
    /// A console call, arguments already rendered
    Console { level: LogLevel, text: String },

    /// The guest caught an exception from the user program
    Exception { message: String },

    /// The user program returned normally
    Done,

    /// Stdout line that was not an envelope
    Output(String),

    /// Diagnostic line from the guest's error stream
    Stderr(String),

    /// The guest is gone; nothing follows
    Exited { code: Option<i32> },
}

/// Abstract isolated runtime
///
/// Implemented by [`super::ProcessRuntime`] for real runs; tests substitute
/// scripted runtimes.
#[async_trait]
pub trait IsolatedRuntime: Send + Sync {
    /// Start `program` and return a handle to its message stream
    async fn launch(&self, program: String) -> ClassroomResult<Instance>;

    /// Get the human-readable runtime name for display
    fn runtime_name(&self) -> &'static str;
}

/// A launched guest
///
/// Dropping the instance tears the guest down. No cleanup code runs inside
/// the guest.
pub struct Instance {
    messages: mpsc::UnboundedReceiver<GuestMessage>,
    driver: Option<JoinHandle<()>>,
}

impl Instance {
    /// Wrap a message stream; `driver` is aborted when the instance drops
    pub fn new(
        messages: mpsc::UnboundedReceiver<GuestMessage>,
        driver: Option<JoinHandle<()>>,
    ) -> Self {
        Self { messages, driver }
    }

    /// Next message, or `None` once the guest is gone
    pub async fn next(&mut self) -> Option<GuestMessage> {
        self.messages.recv().await
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yields_messages_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(GuestMessage::Output("a".into())).unwrap();
        tx.send(GuestMessage::Done).unwrap();
        drop(tx);

        let mut instance = Instance::new(rx, None);
        assert_eq!(instance.next().await, Some(GuestMessage::Output("a".into())));
        assert_eq!(instance.next().await, Some(GuestMessage::Done));
        assert_eq!(instance.next().await, None);
    }

    #[tokio::test]
    async fn drop_aborts_driver() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let driver = tokio::spawn(std::future::pending::<()>());
        let abort = driver.abort_handle();

        drop(Instance::new(rx, Some(driver)));
        for _ in 0..50 {
            if abort.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(abort.is_finished());
    }
}
