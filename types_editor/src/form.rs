use std::ops::RangeInclusive;
use types_core::{Association, Flags, IntField, TypeRecord, TypesError};

/// One row of the edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Int(IntField),
    Flags,
    Category,
    List(Association),
}

impl FormField {
    pub const COUNT: usize = 1 + IntField::ALL.len() + 2 + Association::ALL.len();

    /// Field at a form row, top to bottom
    pub fn at(index: usize) -> Option<FormField> {
        let ints = IntField::ALL.len();
        match index {
            0 => Some(FormField::Name),
            i if i <= ints => Some(FormField::Int(IntField::ALL[i - 1])),
            i if i == ints + 1 => Some(FormField::Flags),
            i if i == ints + 2 => Some(FormField::Category),
            i => Association::ALL.get(i - ints - 3).copied().map(FormField::List),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Int(field) => field.label(),
            FormField::Flags => "Flags",
            FormField::Category => "Category",
            FormField::List(kind) => kind.label(),
        }
    }

    /// Whether typing edits the field value directly
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::Name | FormField::Int(_) | FormField::Category
        )
    }
}

/// Accepted input range for each integer field
pub fn input_range(field: IntField) -> RangeInclusive<i64> {
    match field {
        IntField::Nominal => -1..=10_000,
        IntField::Lifetime => -1..=1_000_000,
        IntField::Restock => -1..=1_000_000,
        IntField::Min => 0..=10_000,
        IntField::QuantMin => -1..=100_000,
        IntField::QuantMax => -1..=100_000,
        IntField::Cost => 0..=1_000_000,
    }
}

/// Editable snapshot of a record; every scalar is kept as typed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordForm {
    pub name: String,
    pub ints: [String; 7],
    /// Integer text as loaded; unchanged values skip the input range check
    loaded_ints: [String; 7],
    pub flags: Flags,
    pub category: String,
    pub usages: Vec<String>,
    pub values: Vec<String>,
    pub tags: Vec<String>,
}

impl Default for RecordForm {
    fn default() -> Self {
        RecordForm {
            name: String::new(),
            ints: Default::default(),
            loaded_ints: Default::default(),
            flags: Flags::default(),
            category: String::new(),
            usages: Vec::new(),
            values: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl RecordForm {
    pub fn from_record(record: &TypeRecord) -> Self {
        let mut ints: [String; 7] = Default::default();
        for (slot, field) in ints.iter_mut().zip(IntField::ALL) {
            *slot = record.int(field).map(|v| v.to_string()).unwrap_or_default();
        }
        RecordForm {
            name: record.name.clone(),
            loaded_ints: ints.clone(),
            ints,
            flags: record.flags,
            category: record.category.clone().unwrap_or_default(),
            usages: record.usages.clone(),
            values: record.values.clone(),
            tags: record.tags.clone(),
        }
    }

    pub fn to_record(&self) -> Result<TypeRecord, TypesError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TypesError::validation("Type name is required."));
        }

        let mut record = TypeRecord::new(name);
        let fields = self.ints.iter().zip(&self.loaded_ints).zip(IntField::ALL);
        for ((text, loaded), field) in fields {
            let edited = text.trim() != loaded.trim();
            record.set_int(field, parse_int_field(field, text, edited)?);
        }
        record.flags = self.flags;

        let category = self.category.trim();
        record.category = (!category.is_empty()).then(|| category.to_string());

        for kind in Association::ALL {
            for entry in self.list(kind) {
                record.add_association(kind, entry);
            }
        }
        Ok(record)
    }

    pub fn text(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.name.clone(),
            FormField::Int(f) => self.ints[int_slot(f)].clone(),
            FormField::Category => self.category.clone(),
            FormField::Flags | FormField::List(_) => String::new(),
        }
    }

    pub fn set_text(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Int(f) => self.ints[int_slot(f)] = value,
            FormField::Category => self.category = value,
            FormField::Flags | FormField::List(_) => {}
        }
    }

    pub fn list(&self, kind: Association) -> &[String] {
        match kind {
            Association::Usage => &self.usages,
            Association::Value => &self.values,
            Association::Tag => &self.tags,
        }
    }

    fn list_mut(&mut self, kind: Association) -> &mut Vec<String> {
        match kind {
            Association::Usage => &mut self.usages,
            Association::Value => &mut self.values,
            Association::Tag => &mut self.tags,
        }
    }

    /// Add a trimmed entry unless it is blank or already listed
    pub fn add_to_list(&mut self, kind: Association, text: &str) -> bool {
        let text = text.trim();
        let list = self.list_mut(kind);
        if text.is_empty() || list.iter().any(|e| e == text) {
            return false;
        }
        list.push(text.to_string());
        true
    }

    pub fn remove_from_list(&mut self, kind: Association, index: usize) -> Option<String> {
        let list = self.list_mut(kind);
        (index < list.len()).then(|| list.remove(index))
    }
}

fn int_slot(field: IntField) -> usize {
    IntField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or_default()
}

/// Out-of-range values are only refused when the user typed them
fn parse_int_field(field: IntField, text: &str, edited: bool) -> Result<Option<i64>, TypesError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let range = input_range(field);
    let value = text.parse::<i64>().map_err(|_| {
        TypesError::validation(format!("{} must be a whole number.", field.label()))
    })?;
    if edited && !range.contains(&value) {
        return Err(TypesError::validation(format!(
            "{} must be between {} and {}.",
            field.label(),
            range.start(),
            range.end()
        )));
    }
    Ok(Some(value))
}
