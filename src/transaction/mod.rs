//! Transaction Module
//!
//! Serializes every transaction body submitted to a store.
//!
//! ## Responsibilities
//! - Queue submitted bodies in FIFO order
//! - Run them one at a time on a dedicated worker thread
//! - Hand each caller its own result (or error) without affecting others
//!
//! ## Execution Model
//! ```text
//!   caller A ──submit──┐
//!   caller B ──submit──┼──▶ [ job | job | job ] ──▶ worker ──▶ body(&Database)
//!   caller C ──submit──┘          channel              │
//!                                                      ▼
//!                                   per-job result channel ──▶ handle.wait()
//! ```
//!
//! A body that never returns stalls every later transaction; there is no
//! timeout or cancellation.

mod queue;

pub use queue::{TransactionHandle, TransactionQueue};
