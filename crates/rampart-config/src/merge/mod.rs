//! Deep merge of TOML values.
//!
//! The merge operates on raw [`toml::Value`] trees rather than deserialized
//! structs, so a key missing from a layer never overrides the layer below.

mod deep;
mod path;
mod types;

pub use deep::merge_layer;
pub(crate) use deep::record_leaves;
#[cfg(test)]
pub(crate) use path::get_nested;
pub(crate) use path::set_nested;
pub use types::{ConfigLayer, FieldSources};
