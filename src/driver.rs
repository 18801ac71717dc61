//! Event loop that owns a queue.
//!
//! The queue must only be touched from one thread. The driver gives it one:
//! a current-thread tokio runtime that serves commands from any number of
//! `NoticeHandle`s and sleeps until the pacer's next deadline in between.
//!
//! The driver stops when every handle has been dropped.
//!
//! # Example
//!
//! ```ignore
//! let (handle, thread) = NoticeDriver::spawn(|| NoticeQueue::new().with_policy(policy))?;
//! let mut shown = handle.subscribe().await?;
//! handle.add([Notice::new("welcome", 1)]).await?;
//! handle.start().await?;
//!
//! while let Some(visible) = shown.next().await {
//!     render(&visible);
//!     handle.remove(None).await?;
//! }
//! ```

use std::thread::JoinHandle;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};

use crate::error::{QueueError, Result};
use crate::notice::{Notice, NoticeKind};
use crate::queue::{NoticeQueue, Subscription};

type Reply<T> = oneshot::Sender<Result<T>>;

enum Command {
    Subscribe(Reply<Subscription>),
    Add(Vec<Notice>, Reply<()>),
    Remove(Option<NoticeKind>, Reply<()>),
    BackNavigation(Reply<bool>),
    Start(Reply<()>),
    Stop(Reply<()>),
    Clear(Reply<()>),
    Pending(Reply<Vec<Notice>>),
}

/// Cloneable, `Send` access to a driven queue.
#[derive(Clone)]
pub struct NoticeHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl NoticeHandle {
    pub async fn subscribe(&self) -> Result<Subscription> {
        self.request(Command::Subscribe).await
    }

    pub async fn add(&self, notices: impl IntoIterator<Item = Notice>) -> Result<()> {
        let notices: Vec<Notice> = notices.into_iter().collect();
        self.request(|reply| Command::Add(notices, reply)).await
    }

    pub async fn remove(&self, kind: Option<NoticeKind>) -> Result<()> {
        self.request(|reply| Command::Remove(kind, reply)).await
    }

    pub async fn on_back_navigation(&self) -> Result<bool> {
        self.request(Command::BackNavigation).await
    }

    pub async fn start(&self) -> Result<()> {
        self.request(Command::Start).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.request(Command::Stop).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.request(Command::Clear).await
    }

    pub async fn pending_notices(&self) -> Result<Vec<Notice>> {
        self.request(Command::Pending).await
    }

    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.tx.send(command(reply)).map_err(|_| QueueError::DriverClosed)?;
        response.await.map_err(|_| QueueError::DriverClosed)?
    }
}

/// Owns a queue and serves handle commands on a single thread.
pub struct NoticeDriver {
    queue: NoticeQueue,
    rx: mpsc::UnboundedReceiver<Command>,
}

impl NoticeDriver {
    /// Wrap a queue built on the current thread.
    ///
    /// `run` must then be polled on that same thread, e.g. by a current-thread
    /// runtime. The queue's clock must share tokio's timeline (`SystemClock`
    /// or `TokioClock`).
    pub fn new(queue: NoticeQueue) -> (Self, NoticeHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { queue, rx }, NoticeHandle { tx })
    }

    /// Run a driver on a dedicated thread, building the queue there.
    pub fn spawn<F>(build: F) -> Result<(NoticeHandle, JoinHandle<Result<()>>)>
    where
        F: FnOnce() -> NoticeQueue + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let thread = std::thread::Builder::new()
            .name("noticeq-driver".to_string())
            .spawn(move || -> Result<()> {
                let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
                let driver = NoticeDriver { queue: build(), rx };
                runtime.block_on(driver.run())
            })?;
        Ok((NoticeHandle { tx }, thread))
    }

    /// Serve commands and pacer deadlines until all handles are dropped.
    pub async fn run(mut self) -> Result<()> {
        tracing::debug!("Notice driver started");
        loop {
            let deadline = self.queue.next_deadline();
            tokio::select! {
                command = self.rx.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = sleep_until(deadline) => {
                    self.queue.poll()?;
                }
            }
        }
        tracing::debug!("Notice driver stopped");
        Ok(())
    }

    fn handle(&mut self, command: Command) {
        // A caller that gave up on the reply is not an error.
        match command {
            Command::Subscribe(reply) => {
                let _ = reply.send(self.queue.on_show());
            }
            Command::Add(notices, reply) => {
                let _ = reply.send(self.queue.add(notices));
            }
            Command::Remove(kind, reply) => {
                let _ = reply.send(self.queue.remove(kind.as_ref()));
            }
            Command::BackNavigation(reply) => {
                let _ = reply.send(self.queue.on_back_navigation());
            }
            Command::Start(reply) => {
                let _ = reply.send(self.queue.start());
            }
            Command::Stop(reply) => {
                let _ = reply.send(self.queue.stop());
            }
            Command::Clear(reply) => {
                let _ = reply.send(self.queue.clear());
            }
            Command::Pending(reply) => {
                let _ = reply.send(Ok(self.queue.pending_notices()));
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
