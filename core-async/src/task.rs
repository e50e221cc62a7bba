//! Task spawning and fan-out helpers.
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//!
//! async fn example() {
//!     let handle = task::spawn(async { 42 });
//!     assert_eq!(handle.await.unwrap(), 42);
//!
//!     // Results come back in input order, whatever order the futures finish in.
//!     let values = task::join_ordered((1..=3).map(|n| async move { n * 2 })).await;
//!     assert_eq!(values, vec![2, 4, 6]);
//! }
//! ```

use std::future::Future;

pub use tokio::task::{spawn_blocking, yield_now, JoinError, JoinHandle};

/// Spawns a new asynchronous task on the current Tokio runtime.
///
/// The spawned task may run on a different thread.
///
/// # Examples
///
/// ```rust
/// use core_async::task::spawn;
///
/// # async fn example() {
/// let handle = spawn(async { 42 });
/// let result = handle.await.unwrap();
/// assert_eq!(result, 42);
/// # }
/// ```
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Drives every future concurrently on the calling task and returns their
/// outputs in the same order the futures were supplied.
///
/// Completion order has no influence on output order. Nothing is spawned,
/// so the futures do not need to be `Send` or `'static`.
pub async fn join_ordered<I>(futures: I) -> Vec<<I::Item as Future>::Output>
where
    I: IntoIterator,
    I::Item: Future,
{
    futures::future::join_all(futures).await
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
