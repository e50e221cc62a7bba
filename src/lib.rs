//! Workspace umbrella crate.
//!
//! Re-exports the list engine and its façade behind the documented feature
//! flags, so a host application can depend on `demonlist-workspace` alone
//! instead of wiring `core-service` and `core-list` individually.

#[cfg(feature = "desktop-shims")]
pub use core_list as list;
#[cfg(feature = "desktop-shims")]
pub use core_service::{CoreError, CoreService, Result};
