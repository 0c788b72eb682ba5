//! React component generation from parsed markdown documents.
//!
//! Takes the output of `jsxdown-markdown` and emits the source of a module
//! that imports the document's dependencies, defines the components lifted
//! out of demo blocks, exports the front matter and renders the document.

pub mod builder;
pub mod casing;

pub use builder::{build_component, build_component_with, BuildError, BuildOptions};
pub use casing::{camelize, camelize_keys};
