use crate::error::{Result, TypesError};
use crate::record::{TypeRecord, TYPE_ELEMENT};
use crate::xml::XmlNode;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Root element name of a types.xml document
pub const ROOT_ELEMENT: &str = "types";

/// Records read from one types.xml file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypesDocument {
    pub records: Vec<TypeRecord>,
}

impl TypesDocument {
    /// Non-empty categories used by the records, sorted
    pub fn categories(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.category_name())
            .map(str::to_string)
            .collect()
    }
}

/// Parse document text. The root must be `<types>`; only its direct
/// `<type>` children are read. Records without a name are skipped, and
/// of a repeated name only the first record is kept.
pub fn parse_document_str(xml: &str) -> Result<TypesDocument> {
    let root = XmlNode::parse(xml)?;
    if root.name != ROOT_ELEMENT {
        return Err(TypesError::WrongRoot(root.name));
    }

    let mut records: Vec<TypeRecord> = Vec::new();
    let mut seen = HashSet::new();
    for node in root.children_named(TYPE_ELEMENT) {
        let record = TypeRecord::from_node(node);
        if record.name.is_empty() {
            tracing::warn!("skipping <type> element without a name");
            continue;
        }
        if !seen.insert(record.name.clone()) {
            tracing::warn!("skipping repeated type '{}'", record.name);
            continue;
        }
        records.push(record);
    }
    Ok(TypesDocument { records })
}

pub fn load_document(path: &Path) -> Result<TypesDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| TypesError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let document = parse_document_str(&content)?;
    tracing::info!(
        "loaded {} types from {}",
        document.records.len(),
        path.display()
    );
    Ok(document)
}

/// Build the `<types>` tree for a list of records
pub fn document_node(records: &[TypeRecord]) -> XmlNode {
    let mut root = XmlNode::new(ROOT_ELEMENT);
    for record in records {
        root.push_child(record.to_node());
    }
    root
}

/// Render records as an indented types.xml document
pub fn serialize_document(records: &[TypeRecord], indent: usize) -> std::io::Result<String> {
    document_node(records).to_pretty_string(indent)
}

pub fn save_document(path: &Path, records: &[TypeRecord], indent: usize) -> Result<()> {
    let write_err = |e| TypesError::Write {
        path: path.to_path_buf(),
        source: e,
    };

    let content = serialize_document(records, indent).map_err(write_err)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, content).map_err(write_err)?;
    tracing::info!("saved {} types to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::TypeCollection;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>
<types>
    <type name="AKM">
        <nominal>10</nominal>
        <lifetime>28800</lifetime>
        <restock>0</restock>
        <min>5</min>
        <quantmin>-1</quantmin>
        <quantmax>-1</quantmax>
        <cost>100</cost>
        <flags count_in_cargo="0" count_in_hoarder="0" count_in_map="1" count_in_player="0" crafted="0" deloot="0"/>
        <category name="weapons"/>
        <usage name="Military"/>
        <value name="Tier3"/>
        <value name="Tier4"/>
    </type>
    <type name="Apple">
        <nominal>40</nominal>
        <category name="food"/>
        <usage name="Farm"/>
        <tag name="floor"/>
    </type>
    <type>
        <nominal>1</nominal>
    </type>
    <spawnable name="ignored"/>
</types>
"#;

    #[test]
    fn test_parse_sample_document() {
        let doc = parse_document_str(SAMPLE).unwrap();
        assert_eq!(doc.records.len(), 2);

        let akm = &doc.records[0];
        assert_eq!(akm.name, "AKM");
        assert_eq!(akm.quant_min, Some(-1));
        assert_eq!(akm.values, vec!["Tier3", "Tier4"]);

        let apple = &doc.records[1];
        assert_eq!(apple.lifetime, None);
        assert_eq!(apple.tags, vec!["floor"]);

        let categories: Vec<String> = doc.categories().into_iter().collect();
        assert_eq!(categories, vec!["food", "weapons"]);
    }

    #[test]
    fn test_repeated_name_keeps_first() {
        let xml = r#"<types>
            <type name="Apple"><nominal>40</nominal></type>
            <type name="Rag"/>
            <type name="Apple"><nominal>99</nominal></type>
        </types>"#;
        let doc = parse_document_str(xml).unwrap();
        let names: Vec<&str> = doc.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Rag"]);
        assert_eq!(doc.records[0].nominal, Some(40));

        let mut collection = TypeCollection::default();
        collection.replace_all(doc.records).unwrap();
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_wrong_root_rejected() {
        let err = parse_document_str(r#"<items><type name="A"/></items>"#).unwrap_err();
        assert!(matches!(err, TypesError::WrongRoot(ref r) if r == "items"));
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_failed_import_leaves_collection_untouched() {
        let mut collection = TypeCollection::default();
        collection
            .replace_all(parse_document_str(SAMPLE).unwrap().records)
            .unwrap();

        let result = parse_document_str("<items/>").and_then(|doc| collection.replace_all(doc.records));
        assert!(result.is_err());
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.records()[0].name, "AKM");
    }

    #[test]
    fn test_serialize_is_stable() {
        let doc = parse_document_str(SAMPLE).unwrap();
        let first = serialize_document(&doc.records, 4).unwrap();
        let reparsed = parse_document_str(&first).unwrap();
        assert_eq!(reparsed, doc);
        let second = serialize_document(&reparsed.records, 4).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialize_layout() {
        let mut record = TypeRecord::new("Apple");
        record.nominal = Some(40);
        let out = serialize_document(&[record], 4).unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<types>\n"));
        assert!(out.contains("\n    <type name=\"Apple\">\n        <nominal>40</nominal>\n"));
        assert!(out.contains(
            "<flags count_in_cargo=\"0\" count_in_hoarder=\"0\" count_in_map=\"1\" \
             count_in_player=\"0\" crafted=\"0\" deloot=\"0\"/>"
        ));
        assert!(!out.contains("lifetime"));
        assert!(out.ends_with("</types>\n"));
    }

    #[test]
    fn test_empty_document() {
        let out = serialize_document(&[], 4).unwrap();
        assert_eq!(parse_document_str(&out).unwrap().records.len(), 0);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("types.xml");
        let doc = parse_document_str(SAMPLE).unwrap();

        save_document(&path, &doc.records, 2).unwrap();
        let loaded = load_document(&path).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("nope.xml")).unwrap_err();
        assert!(matches!(err, TypesError::Read { .. }));
        assert!(err.is_parse_error());
    }
}
