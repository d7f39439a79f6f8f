//! Document loader adapters

pub mod text_file;

pub use text_file::TextFileLoader;
