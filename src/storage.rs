/// Protobuf wire-format encoding of the database.
pub mod binary;
/// Reading and writing the database file.
pub mod file;
/// Protobuf text-format encoding of the database.
pub mod text;

pub use file::{load, save, LoadError};
pub use text::{ParseError, ParseErrorKind};
