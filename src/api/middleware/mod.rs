//! API middleware.

mod trace;

pub use trace::trace_requests;
