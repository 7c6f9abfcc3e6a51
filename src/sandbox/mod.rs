//! Execution sandbox
//!
//! Runs the selected project files in an isolated runtime and reports all
//! output through a [`LogSink`]. Failures inside the guest become log
//! entries; `run` itself never fails.
//!
//! # Modes
//!
//! | Mode | Chosen when | Completes |
//! |------|-------------|-----------|
//! | document | a markup file is present | in the background, see [`Sandbox::settle`] |
//! | script-only | scripts but no markup | before `run` returns |
//!
//! Starting a run tears down the previous one. There is no other way to stop
//! a guest.

pub mod document;
pub mod envelope;
pub mod log;
pub mod process;
pub mod runtime;
pub mod script;
pub mod select;

pub use log::{LogEntry, LogLevel, LogSink, MemoryLog};
pub use process::ProcessRuntime;
pub use runtime::{GuestMessage, Instance, IsolatedRuntime};
pub use select::Plan;

use crate::error::ClassroomError;
use crate::workspace::File;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Logged when a document-mode run starts
pub const PREVIEW_UPDATED: &str = "preview updated";

/// Logged after a script-only run returns normally
pub const EXECUTION_FINISHED: &str = "execution finished";

/// Logged when nothing is runnable
pub const NOTHING_TO_RUN: &str = "nothing to run";

/// Which strategy a run used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Carries the assembled preview document
    Document { markup: String },
    Script,
    Nothing,
}

/// Runs project files and relays their output
pub struct Sandbox {
    runtime: Arc<dyn IsolatedRuntime>,
    log: Arc<dyn LogSink>,
    clear_on_run: bool,
    listener: Option<JoinHandle<()>>,
}

impl Sandbox {
    pub fn new(runtime: Arc<dyn IsolatedRuntime>, log: Arc<dyn LogSink>) -> Self {
        Self {
            runtime,
            log,
            clear_on_run: true,
            listener: None,
        }
    }

    /// Whether the log is cleared at the start of each run
    pub fn clear_on_run(mut self, clear: bool) -> Self {
        self.clear_on_run = clear;
        self
    }

    pub fn runtime_name(&self) -> &'static str {
        self.runtime.runtime_name()
    }

    /// Run `candidates`, falling back to `active` when they hold nothing runnable
    pub async fn run(&mut self, candidates: &[File], active: Option<&File>) -> RunMode {
        self.teardown();
        if self.clear_on_run {
            self.log.clear();
        }

        match select::plan(candidates, active) {
            Plan::Document {
                markup,
                styles,
                scripts,
            } => {
                let doc = document::assemble(&markup, &styles, &scripts);
                self.run_document(&doc).await;
                RunMode::Document { markup: doc.markup }
            }
            Plan::Script { source } => {
                self.run_script(&source).await;
                RunMode::Script
            }
            Plan::Nothing => {
                self.append(LogLevel::Info, NOTHING_TO_RUN);
                RunMode::Nothing
            }
        }
    }

    /// Wait until the current document-mode guest has exited and its output
    /// has been logged
    pub async fn settle(&mut self) {
        if let Some(listener) = self.listener.take() {
            if let Err(e) = listener.await {
                if !e.is_cancelled() {
                    warn!("Output listener failed: {}", e);
                }
            }
        }
    }

    async fn run_script(&self, source: &str) {
        let instance = match script::program(source) {
            Ok(program) => self.runtime.launch(program).await,
            Err(e) => Err(e),
        };
        let mut instance = match instance {
            Ok(instance) => instance,
            Err(e) => {
                self.launch_failed(&e);
                return;
            }
        };
        info!("Script run started on {}", self.runtime.runtime_name());

        let mut settled = false;
        let mut stderr = Vec::new();
        let mut exit = None;
        while let Some(message) = instance.next().await {
            match message {
                GuestMessage::Console { level, text } => self.append(level, text),
                GuestMessage::Output(line) => self.append(LogLevel::Log, line),
                GuestMessage::Exception { message } if !settled => {
                    self.append(LogLevel::Error, format!("Error: {message}"));
                    settled = true;
                }
                GuestMessage::Done if !settled => {
                    self.append(LogLevel::Info, EXECUTION_FINISHED);
                    settled = true;
                }
                GuestMessage::Exception { .. } | GuestMessage::Done => {
                    debug!("Ignoring extra completion report from guest");
                }
                GuestMessage::Stderr(line) => stderr.push(line),
                GuestMessage::Exited { code } => {
                    exit = code;
                    break;
                }
            }
        }

        if !settled {
            self.append(LogLevel::Error, describe_exit(exit, &stderr));
        } else if !stderr.is_empty() {
            debug!("Guest stderr after completion: {}", stderr.join("\n"));
        }
    }

    async fn run_document(&mut self, doc: &document::Document) {
        let instance = match document::host_program(doc) {
            Ok(program) => self.runtime.launch(program).await,
            Err(e) => Err(e),
        };
        self.append(LogLevel::Info, PREVIEW_UPDATED);

        let instance = match instance {
            Ok(instance) => instance,
            Err(e) => {
                self.launch_failed(&e);
                return;
            }
        };
        info!("Document run started on {}", self.runtime.runtime_name());

        let log = Arc::clone(&self.log);
        self.listener = Some(tokio::spawn(relay_document(instance, log)));
    }

    fn launch_failed(&self, error: &ClassroomError) {
        warn!("Failed to start guest: {}", error);
        self.append(LogLevel::Error, format!("Error: {error}"));
    }

    /// Drop the previous run's listener, and with it the guest
    fn teardown(&mut self) {
        if let Some(listener) = self.listener.take() {
            debug!("Replacing previous run");
            listener.abort();
        }
    }

    fn append(&self, level: LogLevel, message: impl Into<String>) {
        self.log.append(LogEntry::new(level, message));
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Single host-side listener for one document-mode guest
async fn relay_document(mut instance: Instance, log: Arc<dyn LogSink>) {
    let mut stderr = Vec::new();
    while let Some(message) = instance.next().await {
        match message {
            GuestMessage::Console { level, text } => log.append(LogEntry::new(level, text)),
            GuestMessage::Output(line) => log.append(LogEntry::new(LogLevel::Log, line)),
            GuestMessage::Exception { message } => {
                log.append(LogEntry::new(LogLevel::Error, format!("Error: {message}")))
            }
            GuestMessage::Done => {}
            GuestMessage::Stderr(line) => stderr.push(line),
            GuestMessage::Exited { code } => {
                if code != Some(0) {
                    log.append(LogEntry::new(LogLevel::Error, describe_exit(code, &stderr)));
                }
                break;
            }
        }
    }
}

fn describe_exit(code: Option<i32>, stderr: &[String]) -> String {
    let status = match code {
        Some(code) => format!("guest exited with status {code}"),
        None => "guest stopped without reporting".to_string(),
    };
    match stderr.iter().rev().find(|line| !line.trim().is_empty()) {
        Some(last) => format!("Error: {status}: {}", last.trim()),
        None => format!("Error: {status}"),
    }
}
