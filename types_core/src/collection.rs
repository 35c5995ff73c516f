use crate::config::default_categories;
use crate::error::{Result, TypesError};
use crate::record::TypeRecord;
use std::collections::{BTreeSet, HashSet};

/// Suffix appended to the name of a duplicated record
pub const DUPLICATE_SUFFIX: &str = "_Copy";

/// Which list position, if any, an edit-and-save applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    At(usize),
}

impl Selection {
    pub fn index(&self) -> Option<usize> {
        match self {
            Selection::None => None,
            Selection::At(i) => Some(*i),
        }
    }
}

/// Ordered, name-unique list of type records for one open document.
///
/// Also tracks the categories seen so far, which only feed suggestion lists
/// and only grow until the next import or `clear`.
#[derive(Debug, Clone)]
pub struct TypeCollection {
    records: Vec<TypeRecord>,
    categories: BTreeSet<String>,
    baseline: Vec<String>,
    selection: Selection,
}

impl Default for TypeCollection {
    fn default() -> Self {
        TypeCollection::new(default_categories())
    }
}

impl TypeCollection {
    /// Create an empty collection with the given well-known categories
    pub fn new(baseline: Vec<String>) -> Self {
        TypeCollection {
            records: Vec::new(),
            categories: BTreeSet::new(),
            baseline,
            selection: Selection::None,
        }
    }

    pub fn records(&self) -> &[TypeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TypeRecord> {
        self.records.get(index)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.position_of(name).is_some()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_record(&self) -> Option<&TypeRecord> {
        self.selection.index().and_then(|i| self.records.get(i))
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.selection = Selection::At(index);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    /// Categories seen in this session, sorted
    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn baseline_categories(&self) -> &[String] {
        &self.baseline
    }

    /// Baseline categories first, then every other known category in order
    pub fn category_suggestions(&self) -> Vec<String> {
        let mut out = self.baseline.clone();
        for category in &self.categories {
            if !out.contains(category) {
                out.push(category.clone());
            }
        }
        out
    }

    /// Append a record; the new position becomes the selection
    pub fn add(&mut self, record: TypeRecord) -> Result<usize> {
        if self.contains_name(&record.name) {
            tracing::warn!("rejected add of duplicate type '{}'", record.name);
            return Err(TypesError::DuplicateName(record.name));
        }
        self.note_category(&record);
        tracing::debug!("added type '{}'", record.name);
        self.records.push(record);
        let index = self.records.len() - 1;
        self.selection = Selection::At(index);
        Ok(index)
    }

    /// Copy the record at `index` and insert the copy right after it.
    ///
    /// The copy is named `<name>_Copy`; if that is taken, `<name>_Copy2`,
    /// `<name>_Copy3` and so on. The copy becomes the selection.
    pub fn duplicate(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        let mut copy = self.records[index].clone();
        copy.name = self.unique_copy_name(&copy.name);
        tracing::debug!("duplicated '{}' as '{}'", self.records[index].name, copy.name);

        let target = index + 1;
        self.records.insert(target, copy);
        self.selection = Selection::At(target);
        Ok(target)
    }

    fn unique_copy_name(&self, base: &str) -> String {
        let first = format!("{base}{DUPLICATE_SUFFIX}");
        if !self.contains_name(&first) {
            return first;
        }
        (2..)
            .map(|n| format!("{base}{DUPLICATE_SUFFIX}{n}"))
            .find(|candidate| !self.contains_name(candidate))
            .unwrap_or(first)
    }

    /// Remove the record at `index`, keeping the selection on a valid entry
    pub fn delete_at(&mut self, index: usize) -> Result<TypeRecord> {
        self.check_index(index)?;
        let removed = self.records.remove(index);
        tracing::debug!("deleted type '{}'", removed.name);

        self.selection = match self.selection {
            _ if self.records.is_empty() => Selection::None,
            Selection::At(sel) if sel == index => Selection::At(index.min(self.records.len() - 1)),
            Selection::At(sel) if sel > index => Selection::At(sel - 1),
            other => other,
        };
        Ok(removed)
    }

    /// Replace the record at `index` in place
    pub fn update_at(&mut self, index: usize, record: TypeRecord) -> Result<()> {
        self.check_index(index)?;
        let clash = self
            .records
            .iter()
            .enumerate()
            .any(|(i, r)| i != index && r.name == record.name);
        if clash {
            tracing::warn!("rejected rename to existing type '{}'", record.name);
            return Err(TypesError::DuplicateName(record.name));
        }
        self.note_category(&record);
        tracing::debug!("updated type '{}' at {}", record.name, index);
        self.records[index] = record;
        self.selection = Selection::At(index);
        Ok(())
    }

    /// Store an edited record: add it when nothing is selected, otherwise
    /// overwrite the selected position. Returns the record's position.
    pub fn save(&mut self, record: TypeRecord) -> Result<usize> {
        if record.name.trim().is_empty() {
            tracing::warn!("rejected save of a type without a name");
            return Err(TypesError::validation("Type name is required."));
        }
        match self.selection {
            Selection::None => self.add(record),
            Selection::At(index) => self.update_at(index, record).map(|_| index),
        }
    }

    /// Swap in a freshly imported document.
    ///
    /// The category set is rebuilt from the incoming records plus the
    /// baseline. Rejects the whole batch if a name is empty or repeated.
    pub fn replace_all(&mut self, records: Vec<TypeRecord>) -> Result<()> {
        let mut seen = HashSet::new();
        for record in &records {
            if record.name.is_empty() {
                return Err(TypesError::validation("Imported type has no name."));
            }
            if !seen.insert(record.name.as_str()) {
                tracing::warn!("import contains type '{}' twice", record.name);
                return Err(TypesError::DuplicateName(record.name.clone()));
            }
        }

        let mut categories: BTreeSet<String> = self.baseline.iter().cloned().collect();
        categories.extend(
            records
                .iter()
                .filter_map(|r| r.category_name())
                .map(str::to_string),
        );

        self.records = records;
        self.categories = categories;
        self.selection = if self.records.is_empty() {
            Selection::None
        } else {
            Selection::At(0)
        };
        tracing::debug!("collection replaced with {} types", self.records.len());
        Ok(())
    }

    /// Start a new empty list
    pub fn clear(&mut self) {
        self.records.clear();
        self.categories.clear();
        self.selection = Selection::None;
    }

    fn note_category(&mut self, record: &TypeRecord) {
        if let Some(category) = record.category_name() {
            if !self.categories.contains(category) {
                self.categories.insert(category.to_string());
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.records.len() {
            return Err(TypesError::Index {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, category: Option<&str>) -> TypeRecord {
        let mut r = TypeRecord::new(name);
        r.category = category.map(str::to_string);
        r
    }

    fn collection_of(names: &[&str]) -> TypeCollection {
        let mut c = TypeCollection::default();
        for name in names {
            c.add(record(name, None)).unwrap();
        }
        c
    }

    fn names(c: &TypeCollection) -> Vec<&str> {
        c.records().iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_add_rejects_duplicate_name() {
        let mut c = collection_of(&["AKM", "Apple"]);
        let err = c.add(record("AKM", Some("weapons"))).unwrap_err();
        assert!(matches!(err, TypesError::DuplicateName(ref n) if n == "AKM"));
        assert_eq!(c.len(), 2);
        assert!(c.categories().is_empty());
    }

    #[test]
    fn test_add_selects_new_entry_and_tracks_category() {
        let mut c = collection_of(&["AKM"]);
        let idx = c.add(record("Apple", Some("food"))).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(c.selection(), Selection::At(1));
        assert!(c.categories().contains("food"));
    }

    #[test]
    fn test_duplicate_inserts_after_source() {
        let mut c = collection_of(&["AKM", "Apple", "Rag"]);
        let mut source = c.get(1).unwrap().clone();
        source.nominal = Some(5);
        source.usages = vec!["Farm".to_string()];
        c.update_at(1, source.clone()).unwrap();

        let idx = c.duplicate(1).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(c.len(), 4);
        assert_eq!(names(&c), vec!["AKM", "Apple", "Apple_Copy", "Rag"]);
        assert_eq!(c.selection(), Selection::At(2));

        let copy = c.get(2).unwrap();
        assert_eq!(copy.nominal, Some(5));
        assert_eq!(copy.usages, source.usages);
        assert_eq!(
            TypeRecord {
                name: source.name.clone(),
                ..copy.clone()
            },
            source
        );
    }

    #[test]
    fn test_duplicate_never_collides() {
        let mut c = collection_of(&["Apple"]);
        c.duplicate(0).unwrap();
        c.duplicate(0).unwrap();
        c.duplicate(0).unwrap();
        assert_eq!(
            names(&c),
            vec!["Apple", "Apple_Copy3", "Apple_Copy2", "Apple_Copy"]
        );
    }

    #[test]
    fn test_duplicate_out_of_range() {
        let mut c = collection_of(&["Apple"]);
        assert!(matches!(
            c.duplicate(3),
            Err(TypesError::Index { index: 3, len: 1 })
        ));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_delete_selected_last_moves_to_new_last() {
        let mut c = collection_of(&["A", "B", "C"]);
        c.select(2).unwrap();
        c.delete_at(2).unwrap();
        assert_eq!(c.selection(), Selection::At(1));
        assert_eq!(c.selected_record().unwrap().name, "B");
    }

    #[test]
    fn test_delete_only_element_clears_selection() {
        let mut c = collection_of(&["A"]);
        c.delete_at(0).unwrap();
        assert_eq!(c.selection(), Selection::None);
        assert!(c.is_empty());
    }

    #[test]
    fn test_delete_keeps_selection_on_same_record() {
        let mut c = collection_of(&["A", "B", "C"]);
        c.select(2).unwrap();
        c.delete_at(0).unwrap();
        assert_eq!(c.selected_record().unwrap().name, "C");

        c.select(0).unwrap();
        c.delete_at(1).unwrap();
        assert_eq!(c.selection(), Selection::At(0));
    }

    #[test]
    fn test_delete_keeps_category() {
        let mut c = TypeCollection::default();
        c.add(record("Apple", Some("fruit"))).unwrap();
        c.delete_at(0).unwrap();
        assert!(c.categories().contains("fruit"));
        assert!(matches!(c.delete_at(0), Err(TypesError::Index { .. })));
    }

    #[test]
    fn test_save_without_selection_adds() {
        let mut c = collection_of(&["A"]);
        c.clear_selection();
        assert_eq!(c.save(record("B", None)).unwrap(), 1);
        assert_eq!(names(&c), vec!["A", "B"]);
    }

    #[test]
    fn test_save_with_selection_updates_in_place() {
        let mut c = collection_of(&["A", "B", "C"]);
        c.select(1).unwrap();
        assert_eq!(c.save(record("B2", Some("tools"))).unwrap(), 1);
        assert_eq!(names(&c), vec!["A", "B2", "C"]);
        assert!(c.categories().contains("tools"));

        // Keeping its own name is not a clash
        assert!(c.save(record("B2", None)).is_ok());
    }

    #[test]
    fn test_save_rename_onto_other_rejected() {
        let mut c = collection_of(&["A", "B"]);
        c.select(1).unwrap();
        let err = c.save(record("A", None)).unwrap_err();
        assert!(matches!(err, TypesError::DuplicateName(_)));
        assert_eq!(names(&c), vec!["A", "B"]);
    }

    #[test]
    fn test_save_requires_name() {
        let mut c = TypeCollection::default();
        assert!(matches!(
            c.save(record("  ", None)),
            Err(TypesError::Validation(_))
        ));
        assert!(c.is_empty());
    }

    #[test]
    fn test_replace_all_rebuilds_categories() {
        let mut c = TypeCollection::default();
        c.add(record("Old", Some("stale"))).unwrap();

        c.replace_all(vec![
            record("AKM", Some("weapons")),
            record("Apple", Some("fruit")),
            record("Rag", None),
        ])
        .unwrap();

        assert_eq!(c.selection(), Selection::At(0));
        assert!(!c.categories().contains("stale"));
        let mut expected: Vec<String> = default_categories();
        expected.push("fruit".to_string());
        expected.sort();
        let got: Vec<String> = c.categories().iter().cloned().collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_categories_union_after_import_and_edits() {
        let mut c = TypeCollection::default();
        c.replace_all(vec![
            record("A", Some("weapons")),
            record("B", Some("custom_a")),
        ])
        .unwrap();
        c.add(record("C", Some("custom_a"))).unwrap();
        c.add(record("D", Some("custom_b"))).unwrap();

        let mut expected = default_categories();
        expected.extend(["custom_a".to_string(), "custom_b".to_string()]);
        expected.sort();
        expected.dedup();
        let got: Vec<String> = c.categories().iter().cloned().collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_second_import_replaces_first_categories() {
        let mut c = TypeCollection::default();
        c.replace_all(vec![
            record("A", Some("weapons")),
            record("B", Some("custom_a")),
            record("C", Some("shared")),
        ])
        .unwrap();
        c.replace_all(vec![
            record("D", Some("shared")),
            record("E", Some("custom_b")),
        ])
        .unwrap();

        let mut expected = default_categories();
        expected.extend(["shared".to_string(), "custom_b".to_string()]);
        expected.sort();
        let got: Vec<String> = c.categories().iter().cloned().collect();
        assert_eq!(got, expected);
        assert!(!c.categories().contains("custom_a"));
        assert_eq!(names(&c), vec!["D", "E"]);
    }

    #[test]
    fn test_update_out_of_range() {
        let mut c = collection_of(&["A"]);
        let err = c.update_at(3, record("B", None)).unwrap_err();
        assert!(matches!(err, TypesError::Index { index: 3, len: 1 }));
        assert_eq!(names(&c), vec!["A"]);
    }

    #[test]
    fn test_replace_all_rejects_duplicates_without_change() {
        let mut c = collection_of(&["Keep"]);
        let err = c
            .replace_all(vec![record("X", None), record("X", None)])
            .unwrap_err();
        assert!(matches!(err, TypesError::DuplicateName(_)));
        assert_eq!(names(&c), vec!["Keep"]);
    }

    #[test]
    fn test_category_suggestions_order() {
        let mut c = TypeCollection::new(vec!["weapons".to_string(), "food".to_string()]);
        c.add(record("A", Some("zeta"))).unwrap();
        c.add(record("B", Some("food"))).unwrap();
        c.add(record("C", Some("alpha"))).unwrap();
        assert_eq!(
            c.category_suggestions(),
            vec!["weapons", "food", "alpha", "zeta"]
        );
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut c = TypeCollection::default();
        c.add(record("A", Some("food"))).unwrap();
        c.clear();
        assert!(c.is_empty());
        assert!(c.categories().is_empty());
        assert_eq!(c.selection(), Selection::None);
        assert!(c.select(0).is_err());
    }
}
