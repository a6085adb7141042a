//! Collaborative code room server library.
//!
//! This library implements session coordination for shared-editor rooms
//! (membership, event routing, document hand-off) and a sandboxed execution
//! pipeline that compiles and runs participant-submitted C++ inside a
//! resource-bounded child process.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
