//! nan — NaN-tolerant adapters over the weighted estimators.
//!
//! Purpose
//! -------
//! Let callers feed samples that contain NaN/±inf (and errors that are NaN
//! or non-positive) to the weighted estimators without pre-filtering.
//! Invalid entries are not removed; they are zeroed and given zero weight,
//! so array shapes and axis semantics are preserved.
//!
//! Key behaviors
//! -------------
//! - [`wnan_to_num`] produces the sanitized `(y', w')` pair.
//! - [`nanwsem`], [`nanwstd`], [`naniqr`] sanitize and delegate; they add no
//!   algorithm of their own.
//!
//! Invariants & assumptions
//! ------------------------
//! - Caller arrays are never modified.
//! - Results do not depend on the values stored at zero-weight positions.
//!
//! Downstream usage
//! ----------------
//! - `use wstat::nan::prelude::*;`

pub mod sanitize;
pub mod wrappers;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::sanitize::wnan_to_num;
pub use self::wrappers::{naniqr, nanwsem, nanwstd};

pub mod prelude {
    pub use super::sanitize::wnan_to_num;
    pub use super::wrappers::{naniqr, nanwsem, nanwstd};
}
