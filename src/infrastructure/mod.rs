//! Infrastructure: CKL parsing/serialization and storage adapters

pub mod document;
pub mod parser;
pub mod storage;
pub mod writer;

pub use document::DocumentTree;
pub use parser::{ChecklistParser, ParsedChecklist};
pub use storage::{LocalFileStorage, ReadOutcome, StorageProvider, WritableSink};
pub use writer::ChecklistWriter;
