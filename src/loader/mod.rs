mod openapi;
pub mod refs;

pub use openapi::{SchemaProvider, load_openapi};
