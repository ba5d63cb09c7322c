/// Items that appeared since the previous refresh, shown in their own overlay
///
/// The overlay keeps a pick set separate from the grid selection: toggling a
/// card here never touches `SelectionController`.
use std::collections::HashSet;

use super::data::{DeleteReport, Item};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewItems {
    /// Newest arrivals last, in the order they were reported
    items: Vec<Item>,
    picked: HashSet<String>,
}

impl NewItems {
    pub fn new(items: Vec<Item>) -> Self {
        let mut new_items = Self::default();
        new_items.extend(items);
        new_items
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_picked(&self, id: &str) -> bool {
        self.picked.contains(id)
    }

    pub fn picked_count(&self) -> usize {
        self.picked.len()
    }

    /// Add arrivals from a later refresh; ids already listed are skipped
    pub fn extend(&mut self, items: Vec<Item>) {
        for item in items {
            if !self.items.iter().any(|known| known.path == item.path) {
                self.items.push(item);
            }
        }
    }

    /// Flip one card; ids not in the overlay are ignored
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.items.iter().any(|item| item.path == id) {
            return false;
        }
        if !self.picked.remove(id) {
            self.picked.insert(id.to_string());
        }
        true
    }

    /// Pick every listed card
    pub fn pick_all(&mut self) {
        self.picked = self.items.iter().map(|item| item.path.clone()).collect();
    }

    /// Picked ids in listing order, for the delete batch
    pub fn picked_in_order(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| self.picked.contains(&item.path))
            .map(|item| item.path.clone())
            .collect()
    }

    /// Drop cards whose files were removed; failed ones stay listed and picked
    pub fn apply_deletions(&mut self, report: &DeleteReport) {
        let deleted: HashSet<&str> = report.deleted.iter().map(String::as_str).collect();
        self.items.retain(|item| !deleted.contains(item.path.as_str()));
        self.picked.retain(|id| !deleted.contains(id.as_str()));
    }

    /// Keep only ids still present in the listing
    pub fn retain_known(&mut self, listing: &[Item]) {
        let known: HashSet<&str> = listing.iter().map(|item| item.path.as_str()).collect();
        self.items.retain(|item| known.contains(item.path.as_str()));
        self.picked.retain(|id| known.contains(id.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::ItemKind;
    use chrono::{TimeZone, Utc};

    fn item(path: &str) -> Item {
        Item {
            path: path.to_string(),
            name: path.to_string(),
            modified: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            size: 1,
            kind: ItemKind::Image,
        }
    }

    fn arrivals() -> NewItems {
        NewItems::new(vec![item("a.png"), item("b.png"), item("c.png")])
    }

    #[test]
    fn test_toggle_and_pick_all() {
        let mut new_items = arrivals();
        assert_eq!(new_items.picked_count(), 0);

        assert!(new_items.toggle("b.png"));
        assert!(new_items.is_picked("b.png"));
        assert!(new_items.toggle("b.png"));
        assert!(!new_items.is_picked("b.png"));
        assert!(!new_items.toggle("elsewhere.png"));

        new_items.toggle("c.png");
        new_items.pick_all();
        assert_eq!(new_items.picked_in_order(), ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_extend_skips_known_ids() {
        let mut new_items = arrivals();
        new_items.extend(vec![item("b.png"), item("d.png")]);
        let paths: Vec<&str> = new_items.items().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, ["a.png", "b.png", "c.png", "d.png"]);
    }

    #[test]
    fn test_deletions_keep_failed_cards() {
        let mut new_items = arrivals();
        new_items.pick_all();
        new_items.apply_deletions(&DeleteReport {
            deleted: vec!["a.png".into(), "c.png".into()],
            failed: vec![("b.png".into(), "locked".into())],
        });

        assert_eq!(new_items.len(), 1);
        assert_eq!(new_items.picked_in_order(), ["b.png"]);
    }

    #[test]
    fn test_retain_known_drops_vanished() {
        let mut new_items = arrivals();
        new_items.toggle("a.png");
        new_items.retain_known(&[item("b.png"), item("c.png")]);
        assert_eq!(new_items.len(), 2);
        assert_eq!(new_items.picked_count(), 0);

        new_items.retain_known(&[]);
        assert!(new_items.is_empty());
    }
}
