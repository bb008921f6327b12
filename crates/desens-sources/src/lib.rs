//! Input side of the batch: finding files and extracting paragraphs

pub mod denylist;
pub mod doc;
pub mod docx;
pub mod enumerate;
pub mod error;
pub mod pdf;
pub mod reader;
pub mod text;
mod tool;

pub use denylist::Denylist;
pub use enumerate::FileEnumerator;
pub use error::{ReadError, Result};
pub use reader::{DocumentReader, ReaderRegistry};
