//! Statistical-significance engine for two-arm conversion experiments:
//! standard-normal primitives, a pooled two-proportion z-test,
//! fixed-horizon sample-size planning, and decision classification.
//!
//! The engine is pure and synchronous. It holds no state, performs no I/O,
//! and every public function is safe to call concurrently; the calling
//! layer owns fetching variant counters and persisting the returned
//! `Decision`.

pub mod classifier;
pub mod normal;
pub mod planner;
pub mod significance;

pub use classifier::analyze;
pub use significance::compute;
