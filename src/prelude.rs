//! Convenient re-exports for common usage.
//!
//! The prelude brings in the chain types, the extension trait and the
//! construction macros.
//!
//! ## Usage
//!
//! ```rust
//! use errchain::prelude::*;
//!
//! fn inner() -> Result<(), Chain> {
//!     Err(new!("not ready"))
//! }
//!
//! fn outer() -> Result<(), Chain> {
//!     inner().wrap("starting worker")?;
//!     Ok(())
//! }
//!
//! assert_eq!(outer().unwrap_err().to_string(), "starting worker: not ready");
//! ```

pub use crate::{BoxError, Chain, Coded, Const, ResultExt};
pub use crate::{annotate, new, new_with_code, wrap, wrap_into, wrap_with_code};
