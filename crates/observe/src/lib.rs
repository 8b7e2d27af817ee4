//! Observability glue shared between the binaries and the tests:
//! initialization logic for logging plus a panic hook.
pub mod panic_hook;
pub mod tracing;
