//! Transaction Queue
//!
//! Single worker draining an unbounded FIFO channel.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use tracing::{debug, trace, warn};

use crate::database::Database;
use crate::error::{JsonDbError, Result};

/// A queued transaction, already wrapped with its result slot
type Job = Box<dyn FnOnce(&Database) + Send + 'static>;

/// Runs transaction bodies one at a time, in submission order
///
/// ## Concurrency:
/// - `sender`: shared by every submitter through `&self`
/// - `running`: set by the worker while a body executes
/// - Dropping the queue closes the channel; the worker finishes what is
///   already queued and is joined
pub struct TransactionQueue {
    sender: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    next_seq: AtomicU64,
}

impl TransactionQueue {
    /// Spawn the worker thread
    pub fn start(db: Database) -> Result<Self> {
        let (sender, receiver) = channel::unbounded::<Job>();
        let running = Arc::new(AtomicBool::new(false));

        let worker_running = Arc::clone(&running);
        let worker = thread::Builder::new()
            .name("jsondb-transactions".to_string())
            .spawn(move || Self::run(db, receiver, worker_running))?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            running,
            next_seq: AtomicU64::new(1),
        })
    }

    /// Queue `body`; the returned handle yields its result
    pub fn submit<R, F>(&self, body: F) -> TransactionHandle<R>
    where
        F: FnOnce(&Database) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let (reply, receiver) = channel::bounded::<Result<R>>(1);
        let handle = TransactionHandle { receiver };

        let job_reply = reply.clone();
        let job: Job = Box::new(move |db: &Database| {
            trace!(seq, "Transaction started");
            let result = match panic::catch_unwind(AssertUnwindSafe(|| body(db))) {
                Ok(result) => result,
                Err(payload) => Err(JsonDbError::TransactionPanicked(panic_message(payload))),
            };

            match &result {
                Ok(_) => trace!(seq, "Transaction committed"),
                Err(e) => warn!(seq, error = %e, "Transaction failed"),
            }

            // The caller may have dropped its handle
            let _ = job_reply.send(result);
        });

        let sent = match &self.sender {
            Some(sender) => sender.send(job).is_ok(),
            None => false,
        };
        if !sent {
            let _ = reply.send(Err(JsonDbError::QueueClosed));
        }

        handle
    }

    /// Transactions waiting to start
    pub fn pending(&self) -> usize {
        self.sender.as_ref().map_or(0, Sender::len)
    }

    /// Whether a transaction body is executing right now
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Worker loop: one job at a time until the channel closes
    fn run(db: Database, receiver: Receiver<Job>, running: Arc<AtomicBool>) {
        debug!(root = %db.root().display(), "Transaction worker started");

        for job in receiver.iter() {
            running.store(true, Ordering::SeqCst);
            job(&db);
            running.store(false, Ordering::SeqCst);
        }

        debug!(root = %db.root().display(), "Transaction worker stopped");
    }
}

impl Drop for TransactionQueue {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit
        drop(self.sender.take());

        if let Some(worker) = self.worker.take() {
            // Last handle dropped from inside a transaction body
            if worker.thread().id() == thread::current().id() {
                return;
            }
            if worker.join().is_err() {
                warn!("Transaction worker panicked");
            }
        }
    }
}

/// Result slot for one submitted transaction
#[must_use = "the transaction result is only observable through the handle"]
#[derive(Debug)]
pub struct TransactionHandle<R> {
    receiver: Receiver<Result<R>>,
}

impl<R> TransactionHandle<R> {
    /// Block until the transaction has run
    pub fn wait(self) -> Result<R> {
        self.receiver.recv().unwrap_or(Err(JsonDbError::QueueClosed))
    }

    /// The result if the transaction has already run
    pub fn try_result(&self) -> Option<Result<R>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(JsonDbError::QueueClosed)),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
