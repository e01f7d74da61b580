//! MediaPick Ingest — library scanning, filename tag extraction, filename
//! review, rename planning and sidecar description tooling.

pub mod describe;
pub mod extract;
pub mod file;
pub mod library;
pub mod rename;

pub use extract::{extract_from_filename, ExtractionResult};
pub use file::ScanOptions;
pub use library::{AssetIndex, MediaFile};
