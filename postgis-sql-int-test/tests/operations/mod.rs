//! Operation integration tests.
//!
//! Fragments are built through the public handle and compiled the way a
//! query layer would embed them.

mod concurrency_test;
mod dialect_test;
mod extension_test;
mod relationship_test;
mod transform_test;
