//! Real-time driver.
//!
//! One tokio task owns the [`Session`]. Paddle edges and settings arrive
//! over a command channel; the task sleeps until the next scheduled
//! deadline otherwise. Because only this task touches the session, edges,
//! chain steps and decoder polls never interleave mid-mutation.
//!
//! ```text
//! RuntimeHandle ──Command──▶ [runtime task: Session] ──Snapshot──▶ watch
//! ```

use std::future;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::config::{KeyerConfig, ParamDescriptor};
use crate::element::Element;
use crate::error::KeyerError;
use crate::session::{Session, Snapshot};
use crate::sink::OutputSink;

/// Requests accepted by the runtime task.
#[derive(Debug)]
pub enum Command {
    Press(Element),
    Release(Element),
    /// Applied to the task's own config, so back-to-back changes compose.
    SetParam {
        param: &'static ParamDescriptor,
        value: u64,
    },
    Send {
        text: String,
        reply: oneshot::Sender<Result<(), KeyerError>>,
    },
    Clear,
    Shutdown,
}

/// The runtime task state.
pub struct Runtime<S> {
    session: Session<S>,
    origin: Instant,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Snapshot>,
}

impl<S: OutputSink + Send + 'static> Runtime<S> {
    /// Spawn the runtime on the current tokio runtime.
    pub fn spawn(config: KeyerConfig, sink: S) -> (RuntimeHandle, JoinHandle<()>) {
        let origin = Instant::now();
        let session = Session::new(config, sink, 0);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

        let runtime = Runtime {
            session,
            origin,
            commands: command_rx,
            snapshots: snapshot_tx,
        };
        let task = tokio::spawn(runtime.run());

        let handle = RuntimeHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (handle, task)
    }

    async fn run(mut self) {
        tracing::debug!("runtime started");

        loop {
            let deadline = self.session.next_deadline().map(|d| self.instant_at(d));

            tokio::select! {
                command = self.commands.recv() => match command {
                    None | Some(Command::Shutdown) => break,
                    Some(command) => self.apply(command),
                },
                _ = sleep_until_opt(deadline) => {
                    let now_us = self.now_us();
                    self.session.advance_to(now_us);
                    self.publish();
                }
            }
        }

        let now_us = self.now_us();
        self.session.reset(now_us);
        self.publish();
        tracing::debug!("runtime stopped");
    }

    fn apply(&mut self, command: Command) {
        let now_us = self.now_us();
        match command {
            Command::Press(element) => {
                self.session.press(element, now_us);
            }
            Command::Release(element) => self.session.release(element, now_us),
            Command::SetParam { param, value } => self.session.set_param(param, value),
            Command::Clear => self.session.clear(),
            Command::Send { text, reply } => {
                let result = self.session.send_text(&text, now_us);
                if let Err(err) = &result {
                    tracing::debug!(%err, "send rejected");
                }
                // Publish first so a waiter sees the send as running
                self.publish();
                let _ = reply.send(result);
                return;
            }
            Command::Shutdown => {}
        }
        self.publish();
    }

    fn publish(&self) {
        let snapshot = self.session.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    fn now_us(&self) -> i64 {
        self.origin.elapsed().as_micros() as i64
    }

    fn instant_at(&self, at_us: i64) -> Instant {
        self.origin + Duration::from_micros(at_us.max(0) as u64)
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

/// Cloneable handle to a running keyer.
#[derive(Clone)]
pub struct RuntimeHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl RuntimeHandle {
    pub fn press(&self, element: Element) -> Result<(), KeyerError> {
        self.command(Command::Press(element))
    }

    pub fn release(&self, element: Element) -> Result<(), KeyerError> {
        self.command(Command::Release(element))
    }

    /// Set one parameter. Range checks are the caller's job.
    pub fn set_param(&self, param: &'static ParamDescriptor, value: u64) -> Result<(), KeyerError> {
        self.command(Command::SetParam { param, value })
    }

    pub fn clear(&self) -> Result<(), KeyerError> {
        self.command(Command::Clear)
    }

    /// Start sending `text`, blocking until the runtime accepted or
    /// rejected it.
    ///
    /// For synchronous callers on a blocking thread, such as the console.
    /// Panics if called from inside an async context; use
    /// [`send`](Self::send) there.
    pub fn send_blocking(&self, text: &str) -> Result<(), KeyerError> {
        let reply = self.request_send(text)?;
        reply.blocking_recv().map_err(|_| KeyerError::RuntimeStopped)?
    }

    /// Start sending `text` and wait until the runtime accepted it.
    pub async fn send(&self, text: &str) -> Result<(), KeyerError> {
        let reply = self.request_send(text)?;
        reply.await.map_err(|_| KeyerError::RuntimeStopped)?
    }

    /// Wait until the current send has finished.
    pub async fn wait_send_complete(&mut self) -> Result<(), KeyerError> {
        self.snapshots
            .wait_for(|s| !s.sending)
            .await
            .map(|_| ())
            .map_err(|_| KeyerError::RuntimeStopped)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait for the next published change.
    pub async fn changed(&mut self) -> Result<Snapshot, KeyerError> {
        self.snapshots
            .changed()
            .await
            .map_err(|_| KeyerError::RuntimeStopped)?;
        Ok(self.snapshots.borrow_and_update().clone())
    }

    /// Ask the runtime to stop. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    fn request_send(
        &self,
        text: &str,
    ) -> Result<oneshot::Receiver<Result<(), KeyerError>>, KeyerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command(Command::Send {
            text: text.to_string(),
            reply: reply_tx,
        })?;
        Ok(reply_rx)
    }

    fn command(&self, command: Command) -> Result<(), KeyerError> {
        self.commands
            .send(command)
            .map_err(|_| KeyerError::RuntimeStopped)
    }
}
