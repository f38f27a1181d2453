use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Stable name identifying one field slot on a stored object.
///
/// The optional qualifier (typically the vocabulary namespace the name was
/// declared in) is advisory: equality and hashing consider the name only, so
/// the same field read through different vocabularies resolves to the same
/// slot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    name: String,
    qualifier: Option<String>,
}

impl PropertyDescriptor {
    /// Descriptor for a bare property name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualifier: None,
        }
    }

    /// Attach a qualifier. Does not affect equality or hashing.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// The property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The advisory qualifier, if any.
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }
}

impl PartialEq for PropertyDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PropertyDescriptor {}

impl Hash for PropertyDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Borrow<str> for PropertyDescriptor {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}/{}", q, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn equality_by_name_only() {
        let plain = PropertyDescriptor::new("checksums");
        let qualified = PropertyDescriptor::new("checksums").with_qualifier("https://ex.org/ns#");
        assert_eq!(plain, qualified);
    }

    #[test]
    fn hash_by_name_only() {
        let mut map: HashMap<PropertyDescriptor, u32> = HashMap::new();
        map.insert(PropertyDescriptor::new("name"), 1);
        let qualified = PropertyDescriptor::new("name").with_qualifier("q");
        assert_eq!(map.get(&qualified), Some(&1));
    }

    #[test]
    fn lookup_by_str() {
        let mut map: HashMap<PropertyDescriptor, u32> = HashMap::new();
        map.insert(PropertyDescriptor::new("comment"), 7);
        assert_eq!(map.get("comment"), Some(&7));
    }

    #[test]
    fn display_includes_qualifier() {
        let d = PropertyDescriptor::new("name").with_qualifier("https://ex.org/ns#");
        assert_eq!(d.to_string(), "https://ex.org/ns#/name");
        assert_eq!(PropertyDescriptor::new("name").to_string(), "name");
    }
}
