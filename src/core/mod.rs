//! Core building blocks: job planning, the cancellable batch runner, and the
//! observer boundary it reports through. Consumed by the high-level `api`
//! module and both front ends.
pub mod discovery;
pub mod job;
pub mod observer;
pub mod params;
pub mod runner;
