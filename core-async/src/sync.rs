//! Synchronization primitives.
//!
//! All primitives are async-aware and `Send + Sync`:
//!
//! - `watch` publishes the latest value of an observable state object
//! - `broadcast` fans events out to independent subscribers
//! - `Notify`, `Mutex`, `RwLock` for coordination between tasks
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::watch;
//!
//! # async fn example() {
//! let (tx, mut rx) = watch::channel(0u32);
//! tx.send_modify(|value| *value += 1);
//! rx.changed().await.unwrap();
//! assert_eq!(*rx.borrow(), 1);
//! # }
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard, Semaphore, SemaphorePermit,
};
