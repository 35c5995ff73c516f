use crate::error::{Result, TypesError};
use crate::record::{TypeRecord, TYPE_ELEMENT};
use crate::xml::XmlNode;
use std::collections::BTreeMap;
use std::path::Path;

/// Reference records used to pre-fill the editor form.
///
/// Kept apart from the open collection; loading more files adds to (and
/// overwrites by name) what is already there.
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    presets: BTreeMap<String, TypeRecord>,
}

impl PresetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TypeRecord> {
        self.presets.get(name)
    }

    /// Preset names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.presets.clear();
    }

    /// Read every named `<type>` under the root of any XML document.
    /// Returns how many records were read.
    pub fn load_str(&mut self, xml: &str) -> Result<usize> {
        let root = XmlNode::parse(xml)?;
        let mut count = 0;
        for node in root.children_named(TYPE_ELEMENT) {
            let record = TypeRecord::from_node(node);
            if record.name.is_empty() {
                continue;
            }
            self.presets.insert(record.name.clone(), record);
            count += 1;
        }
        Ok(count)
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path).map_err(|e| TypesError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let count = self.load_str(&content)?;
        tracing::info!("loaded {} presets from {}", count, path.display());
        Ok(count)
    }
}
