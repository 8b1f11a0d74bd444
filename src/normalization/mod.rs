//! Pure mapping from provider records to local rows. No I/O lives here.

pub mod catalog;
pub mod platform;
pub mod release;
