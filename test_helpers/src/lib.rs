//! Test helpers shared across the accrete workspace.
//!
//! - [`env`] serialises mutations of the process environment behind RAII
//!   guards.
//! - [`fs`] provides an in-memory [`accrete::FileSystem`] that can delay
//!   individual reads, for exercising chain ordering.

pub mod env;
pub mod fs;
