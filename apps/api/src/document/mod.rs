// Document-region locator and range-safe mutation engine.
// Everything here is pure planning over an immutable snapshot; the only
// module that talks to the document service is `batch`, and it does so
// strictly one round-trip at a time.

pub mod batch;
pub mod locator;
pub mod model;
pub mod mutator;
pub mod ops;
pub mod walker;
