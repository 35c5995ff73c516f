use crate::xml::XmlNode;

/// Element name of a single type record
pub const TYPE_ELEMENT: &str = "type";

/// The seven independently optional spawn-tuning integers, in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntField {
    Nominal,
    Lifetime,
    Restock,
    Min,
    QuantMin,
    QuantMax,
    Cost,
}

impl IntField {
    pub const ALL: [IntField; 7] = [
        IntField::Nominal,
        IntField::Lifetime,
        IntField::Restock,
        IntField::Min,
        IntField::QuantMin,
        IntField::QuantMax,
        IntField::Cost,
    ];

    /// Element name used in types.xml
    pub fn tag(&self) -> &'static str {
        match self {
            IntField::Nominal => "nominal",
            IntField::Lifetime => "lifetime",
            IntField::Restock => "restock",
            IntField::Min => "min",
            IntField::QuantMin => "quantmin",
            IntField::QuantMax => "quantmax",
            IntField::Cost => "cost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IntField::Nominal => "Nominal",
            IntField::Lifetime => "Lifetime",
            IntField::Restock => "Restock",
            IntField::Min => "Min",
            IntField::QuantMin => "Quant Min",
            IntField::QuantMax => "Quant Max",
            IntField::Cost => "Cost",
        }
    }
}

/// Spawn-behavior switches, always written as `0`/`1` attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub count_in_cargo: bool,
    pub count_in_hoarder: bool,
    pub count_in_map: bool,
    pub count_in_player: bool,
    pub crafted: bool,
    pub deloot: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            count_in_cargo: false,
            count_in_hoarder: false,
            count_in_map: true,
            count_in_player: false,
            crafted: false,
            deloot: false,
        }
    }
}

impl Flags {
    /// Attribute names in serialization order
    pub const KEYS: [&'static str; 6] = [
        "count_in_cargo",
        "count_in_hoarder",
        "count_in_map",
        "count_in_player",
        "crafted",
        "deloot",
    ];

    pub fn get(&self, key: &str) -> Option<bool> {
        match key {
            "count_in_cargo" => Some(self.count_in_cargo),
            "count_in_hoarder" => Some(self.count_in_hoarder),
            "count_in_map" => Some(self.count_in_map),
            "count_in_player" => Some(self.count_in_player),
            "crafted" => Some(self.crafted),
            "deloot" => Some(self.deloot),
            _ => None,
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut bool> {
        match key {
            "count_in_cargo" => Some(&mut self.count_in_cargo),
            "count_in_hoarder" => Some(&mut self.count_in_hoarder),
            "count_in_map" => Some(&mut self.count_in_map),
            "count_in_player" => Some(&mut self.count_in_player),
            "crafted" => Some(&mut self.crafted),
            "deloot" => Some(&mut self.deloot),
            _ => None,
        }
    }

    /// Set a flag by attribute name. Returns false for unknown keys.
    pub fn set(&mut self, key: &str, value: bool) -> bool {
        match self.slot_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, key: &str) -> bool {
        match self.slot_mut(key) {
            Some(slot) => {
                *slot = !*slot;
                true
            }
            None => false,
        }
    }

    fn from_node(node: &XmlNode) -> Self {
        let mut flags = Flags::default();
        for key in Self::KEYS {
            let parsed = node
                .attribute(key)
                .and_then(|raw| raw.trim().parse::<i64>().ok());
            if let Some(value) = parsed {
                flags.set(key, value != 0);
            }
        }
        flags
    }

    fn to_node(self) -> XmlNode {
        let mut node = XmlNode::new("flags");
        for key in Self::KEYS {
            let on = self.get(key).unwrap_or(false);
            node.set_attribute(key, if on { "1" } else { "0" });
        }
        node
    }
}

/// Multi-valued name associations of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Association {
    Usage,
    Value,
    Tag,
}

impl Association {
    pub const ALL: [Association; 3] = [Association::Usage, Association::Value, Association::Tag];

    pub fn tag(&self) -> &'static str {
        match self {
            Association::Usage => "usage",
            Association::Value => "value",
            Association::Tag => "tag",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Association::Usage => "Usages",
            Association::Value => "Values",
            Association::Tag => "Tags",
        }
    }
}

/// One loot type definition from types.xml
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRecord {
    pub name: String,
    pub nominal: Option<i64>,
    pub lifetime: Option<i64>,
    pub restock: Option<i64>,
    pub min: Option<i64>,
    pub quant_min: Option<i64>,
    pub quant_max: Option<i64>,
    pub cost: Option<i64>,
    pub flags: Flags,
    pub category: Option<String>,
    pub usages: Vec<String>,
    pub values: Vec<String>,
    pub tags: Vec<String>,
}

impl TypeRecord {
    pub fn new(name: impl Into<String>) -> Self {
        TypeRecord {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn int(&self, field: IntField) -> Option<i64> {
        match field {
            IntField::Nominal => self.nominal,
            IntField::Lifetime => self.lifetime,
            IntField::Restock => self.restock,
            IntField::Min => self.min,
            IntField::QuantMin => self.quant_min,
            IntField::QuantMax => self.quant_max,
            IntField::Cost => self.cost,
        }
    }

    pub fn set_int(&mut self, field: IntField, value: Option<i64>) {
        let slot = match field {
            IntField::Nominal => &mut self.nominal,
            IntField::Lifetime => &mut self.lifetime,
            IntField::Restock => &mut self.restock,
            IntField::Min => &mut self.min,
            IntField::QuantMin => &mut self.quant_min,
            IntField::QuantMax => &mut self.quant_max,
            IntField::Cost => &mut self.cost,
        };
        *slot = value;
    }

    /// Category if set to a non-empty string
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn associations(&self, kind: Association) -> &[String] {
        match kind {
            Association::Usage => &self.usages,
            Association::Value => &self.values,
            Association::Tag => &self.tags,
        }
    }

    fn associations_mut(&mut self, kind: Association) -> &mut Vec<String> {
        match kind {
            Association::Usage => &mut self.usages,
            Association::Value => &mut self.values,
            Association::Tag => &mut self.tags,
        }
    }

    /// Append an association unless it is blank or already present.
    /// Returns whether the list changed.
    pub fn add_association(&mut self, kind: Association, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let list = self.associations_mut(kind);
        if list.iter().any(|existing| existing == text) {
            return false;
        }
        list.push(text.to_string());
        true
    }

    pub fn remove_association(&mut self, kind: Association, index: usize) -> Option<String> {
        let list = self.associations_mut(kind);
        (index < list.len()).then(|| list.remove(index))
    }

    /// Read a record from a `<type>` element.
    ///
    /// Never fails: a missing name becomes the empty string, unparseable
    /// integers are treated as absent and unknown attributes or children are
    /// ignored. Duplicate associations are kept as they appear.
    pub fn from_node(node: &XmlNode) -> Self {
        let mut record = TypeRecord::new(node.attribute("name").unwrap_or_default());

        for field in IntField::ALL {
            let value = node
                .child(field.tag())
                .map(|child| child.text.trim())
                .filter(|text| !text.is_empty())
                .and_then(|text| text.parse::<i64>().ok());
            record.set_int(field, value);
        }

        if let Some(flags) = node.child("flags") {
            record.flags = Flags::from_node(flags);
        }

        record.category = node
            .child("category")
            .and_then(|c| c.attribute("name"))
            .map(str::to_string);

        for kind in Association::ALL {
            let names = node
                .children_named(kind.tag())
                .filter_map(|child| child.attribute("name"))
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            *record.associations_mut(kind) = names;
        }

        record
    }

    /// Write the record as a `<type>` element.
    ///
    /// Absent integers produce no child at all; flags are always written.
    pub fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new(TYPE_ELEMENT).with_attribute("name", self.name.as_str());

        for field in IntField::ALL {
            if let Some(value) = self.int(field) {
                node.push_child(XmlNode::new(field.tag()).with_text(value.to_string()));
            }
        }

        node.push_child(self.flags.to_node());

        if let Some(category) = self.category_name() {
            node.push_child(XmlNode::new("category").with_attribute("name", category));
        }

        for kind in Association::ALL {
            for name in self.associations(kind) {
                node.push_child(XmlNode::new(kind.tag()).with_attribute("name", name.as_str()));
            }
        }

        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> TypeRecord {
        let mut record = TypeRecord::new("AKM");
        record.nominal = Some(10);
        record.lifetime = Some(28800);
        record.restock = Some(0);
        record.min = Some(-1);
        record.cost = Some(i64::MAX);
        record.flags.count_in_cargo = true;
        record.flags.count_in_map = false;
        record.category = Some("weapons".to_string());
        record.usages = vec!["Military".to_string(), "Police".to_string()];
        record.values = vec!["Tier3".to_string()];
        record.tags = vec!["shelves".to_string(), "floor".to_string()];
        record
    }

    #[test]
    fn test_round_trip_full_record() {
        let record = full_record();
        assert_eq!(TypeRecord::from_node(&record.to_node()), record);
    }

    #[test]
    fn test_round_trip_sparse_record() {
        let mut record = TypeRecord::new("Apple");
        record.quant_max = Some(0);
        let back = TypeRecord::from_node(&record.to_node());
        assert_eq!(back, record);
        assert_eq!(back.nominal, None);
        assert_eq!(back.quant_max, Some(0));
    }

    #[test]
    fn test_absent_fields_are_not_emitted() {
        let mut record = TypeRecord::new("Apple");
        record.cost = Some(100);
        let node = record.to_node();
        assert!(node.child("nominal").is_none());
        assert!(node.child("lifetime").is_none());
        assert!(node.child("category").is_none());
        assert_eq!(node.child("cost").unwrap().text, "100");
    }

    #[test]
    fn test_flags_always_emitted() {
        let mut record = TypeRecord::new("Nail");
        record.flags = Flags {
            count_in_map: false,
            ..Flags::default()
        };
        let node = record.to_node();
        let flags = node.child("flags").unwrap();
        let keys: Vec<&str> = flags.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, Flags::KEYS.to_vec());
        assert!(flags.attributes.iter().all(|(_, v)| v == "0"));
    }

    #[test]
    fn test_child_order_matches_document_layout() {
        let node = full_record().to_node();
        let names: Vec<&str> = node.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "nominal", "lifetime", "restock", "min", "cost", "flags", "category", "usage",
                "usage", "value", "tag", "tag"
            ]
        );
    }

    #[test]
    fn test_parse_lenient_fields() {
        let node = XmlNode::parse(
            r#"<type>
                <nominal>abc</nominal>
                <lifetime>   </lifetime>
                <restock> 1800 </restock>
                <flags count_in_cargo="1" count_in_map="x" crafted="2" bogus="1"/>
                <category/>
                <usage name="Town"/>
                <usage name=""/>
                <usage name="Town"/>
                <usage/>
                <extra>ignored</extra>
            </type>"#,
        )
        .unwrap();
        let record = TypeRecord::from_node(&node);
        assert_eq!(record.name, "");
        assert_eq!(record.nominal, None);
        assert_eq!(record.lifetime, None);
        assert_eq!(record.restock, Some(1800));
        assert!(record.flags.count_in_cargo);
        assert!(record.flags.count_in_map);
        assert!(record.flags.crafted);
        assert!(!record.flags.deloot);
        assert_eq!(record.category, None);
        assert_eq!(record.usages, vec!["Town", "Town"]);
    }

    #[test]
    fn test_missing_flags_keep_defaults() {
        let node = XmlNode::new("type").with_attribute("name", "Rag");
        let record = TypeRecord::from_node(&node);
        assert_eq!(record.flags, Flags::default());
        assert!(record.flags.count_in_map);
    }

    #[test]
    fn test_empty_category_not_emitted() {
        let mut record = TypeRecord::new("Rag");
        record.category = Some(String::new());
        assert!(record.to_node().child("category").is_none());
    }

    #[test]
    fn test_add_association_rejects_duplicates() {
        let mut record = TypeRecord::new("Rag");
        assert!(record.add_association(Association::Usage, " Town "));
        assert!(!record.add_association(Association::Usage, "Town"));
        assert!(!record.add_association(Association::Usage, "   "));
        assert!(record.add_association(Association::Value, "Town"));
        assert_eq!(record.usages, vec!["Town"]);
        assert_eq!(record.values, vec!["Town"]);

        assert_eq!(
            record.remove_association(Association::Usage, 0),
            Some("Town".to_string())
        );
        assert_eq!(record.remove_association(Association::Usage, 0), None);
    }

    #[test]
    fn test_flag_toggle_by_key() {
        let mut flags = Flags::default();
        assert!(flags.toggle("deloot"));
        assert!(flags.deloot);
        assert!(!flags.toggle("unknown"));
        assert_eq!(flags.get("unknown"), None);
    }
}
