//! Small shared utilities: JSON serialization glue and ID generation.

pub mod id_generator;
pub mod json_ext;
