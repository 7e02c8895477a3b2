//! Local file handling for definitions sent to the API

mod definition;

pub use definition::{DefinitionFile, infer_format};
