pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod presets;
pub mod record;
pub mod xml;

pub use collection::{Selection, TypeCollection};
pub use config::EditorConfig;
pub use document::{load_document, parse_document_str, save_document, serialize_document, TypesDocument};
pub use error::TypesError;
pub use presets::PresetLibrary;
pub use record::{Association, Flags, IntField, TypeRecord};
