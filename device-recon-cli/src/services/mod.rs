//! Business logic, decoupled from file and network I/O

pub mod reconcile;
