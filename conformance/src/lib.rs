//! # Conformance Units
//!
//! Compiler units generated at build time from the fixture domains and compiled
//! against `cdd-compiler-runtime`. The tests of this crate run them.

/// The reduced OpenAPI v3 domain of `core/tests/fixtures/petstore_v3.yaml`.
#[allow(
    clippy::all,
    dead_code,
    missing_docs,
    unreachable_patterns,
    unused_mut,
    unused_variables
)]
pub mod openapi_v3 {
    include!(concat!(env!("OUT_DIR"), "/openapi_v3.rs"));
}

/// A closed type `T` with a required `name` and an optional `count`.
#[allow(
    clippy::all,
    dead_code,
    missing_docs,
    unreachable_patterns,
    unused_mut,
    unused_variables
)]
pub mod counter {
    include!(concat!(env!("OUT_DIR"), "/counter.rs"));
}

/// A recursive item whose references use the `JsonReference` alternative.
#[allow(
    clippy::all,
    dead_code,
    missing_docs,
    unreachable_patterns,
    unused_mut,
    unused_variables
)]
pub mod pointer {
    include!(concat!(env!("OUT_DIR"), "/pointer.rs"));
}
