//! Utilities for graceful shutdown and server plumbing.

pub mod sig_down;

pub use sig_down::SigDown;
