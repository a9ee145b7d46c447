//! Named tables of the drawing: layers and block definitions

use indexmap::IndexMap;

pub mod block_record;
pub mod layer;

pub use block_record::BlockRecord;
pub use layer::{Layer, LayerFlags};

/// Base trait for all table entries
pub trait TableEntry {
    /// Get the entry's name
    fn name(&self) -> &str;
}

/// Generic table for storing named entries
///
/// DXF names are case-insensitive; lookups fold case, iteration keeps
/// insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T: TableEntry> {
    entries: IndexMap<String, T>,
}

impl<T: TableEntry> Table<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Table {
            entries: IndexMap::new(),
        }
    }

    /// Add an entry to the table
    pub fn add(&mut self, entry: T) -> Result<(), String> {
        let name = entry.name().to_uppercase();
        if self.entries.contains_key(&name) {
            return Err(format!("Entry '{}' already exists in table", entry.name()));
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Get an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&name.to_uppercase())
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_uppercase())
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Get all entry names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name())
    }
}

impl<T: TableEntry> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct MockEntry {
        name: String,
    }

    impl TableEntry for MockEntry {
        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_table_add_and_get() {
        let mut table = Table::new();
        assert!(table.add(MockEntry { name: "Walls".to_string() }).is_ok());
        assert!(table.contains("Walls"));
        assert!(table.contains("WALLS"));
        assert_eq!(table.get("walls").map(|e| e.name.as_str()), Some("Walls"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_duplicate_entry() {
        let mut table = Table::new();
        assert!(table.add(MockEntry { name: "Test".to_string() }).is_ok());
        assert!(table.add(MockEntry { name: "test".to_string() }).is_err());
    }

    #[test]
    fn test_table_keeps_insertion_order() {
        let mut table = Table::new();
        for name in ["B", "A", "C"] {
            table.add(MockEntry { name: name.to_string() }).unwrap();
        }
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["B", "A", "C"]);
    }
}
