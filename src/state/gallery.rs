/// The gallery view model: full listing, display order and selection
///
/// The display list is the full listing filtered by the search term, sorted by
/// the active criteria and optionally reversed. Every time it changes the new
/// order is pushed into the selection controller, which evicts ids that are no
/// longer shown.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::data::{DeleteReport, Item};
use super::selection::{Modifiers, SelectionController};

/// How the grid is ordered
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortCriteria {
    /// Newest first
    #[default]
    DateDesc,
    NameAsc,
    /// Largest first
    SizeDesc,
    /// Grouped by extension
    Type,
}

impl SortCriteria {
    pub const ALL: [SortCriteria; 4] = [
        SortCriteria::DateDesc,
        SortCriteria::NameAsc,
        SortCriteria::SizeDesc,
        SortCriteria::Type,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortCriteria::DateDesc => "Date",
            SortCriteria::NameAsc => "Name",
            SortCriteria::SizeDesc => "Size",
            SortCriteria::Type => "Type",
        }
    }

    fn compare(&self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortCriteria::DateDesc => b.modified.cmp(&a.modified),
            SortCriteria::NameAsc => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
            SortCriteria::SizeDesc => b.size.cmp(&a.size),
            SortCriteria::Type => a.extension().cmp(&b.extension()),
        }
    }
}

/// Result of feeding a fresh listing into the gallery
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshOutcome {
    pub changed: bool,
    /// Items not present in the previous listing; empty on the first load
    pub new_items: Vec<Item>,
}

#[derive(Debug)]
pub struct Gallery {
    /// Last listing, unfiltered
    items: Vec<Item>,
    /// What the grid shows, in order
    displayed: Vec<Item>,
    sort: SortCriteria,
    reversed: bool,
    search: String,
    loaded: bool,
    selection: SelectionController,
}

impl Gallery {
    pub fn new(sort: SortCriteria) -> Self {
        Self {
            items: Vec::new(),
            displayed: Vec::new(),
            sort,
            reversed: false,
            search: String::new(),
            loaded: false,
            selection: SelectionController::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn displayed(&self) -> &[Item] {
        &self.displayed
    }

    pub fn sort(&self) -> SortCriteria {
        self.sort
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionController {
        &mut self.selection
    }

    /// Look up a displayed item by id
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.displayed.iter().find(|item| item.path == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.displayed.iter().position(|item| item.path == id)
    }

    /// Swap in a fresh listing.
    ///
    /// Nothing happens when the listing matches the current one: same length
    /// and every path present with the same modification time.
    pub fn replace_items(&mut self, items: Vec<Item>) -> RefreshOutcome {
        if self.loaded && !listing_changed(&self.items, &items) {
            return RefreshOutcome::default();
        }

        let new_items = if self.loaded {
            let known: HashSet<&str> = self.items.iter().map(|item| item.path.as_str()).collect();
            items
                .iter()
                .filter(|item| !known.contains(item.path.as_str()))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        info!(
            total = items.len(),
            new = new_items.len(),
            "gallery listing updated"
        );

        self.items = items;
        self.loaded = true;
        self.refresh_display();

        RefreshOutcome {
            changed: true,
            new_items,
        }
    }

    pub fn set_sort(&mut self, sort: SortCriteria) {
        self.sort = sort;
        self.refresh_display();
    }

    pub fn toggle_reversed(&mut self) {
        self.reversed = !self.reversed;
        self.refresh_display();
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.refresh_display();
    }

    /// Route a card click to the selection, using the card's current position
    pub fn click(&mut self, id: &str, modifiers: Modifiers) -> bool {
        match self.index_of(id) {
            Some(index) => self.selection.click(id, index, modifiers),
            None => false,
        }
    }

    /// Drop items whose files are gone; selected ones among them are evicted
    pub fn remove_items(&mut self, ids: &[String]) {
        let gone: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.items.retain(|item| !gone.contains(item.path.as_str()));
        self.refresh_display();
    }

    /// Drop deleted items and clear the selection after a bulk delete
    pub fn apply_deletions(&mut self, report: &DeleteReport) {
        self.remove_items(&report.deleted);
        self.selection.clear();
    }

    /// Replace a renamed item; the old id leaves the selection
    pub fn apply_rename(&mut self, old_id: &str, renamed: Item) {
        match self.items.iter_mut().find(|item| item.path == old_id) {
            Some(item) => *item = renamed,
            None => self.items.push(renamed),
        }
        self.refresh_display();
    }

    /// The item `step` places away from `current`; `None` past either end
    pub fn preview_neighbour(&self, current: &str, step: isize) -> Option<&Item> {
        let index = self.index_of(current)?;
        self.displayed.get(index.checked_add_signed(step)?)
    }

    fn refresh_display(&mut self) {
        let needle = self.search.to_lowercase();
        let mut shown: Vec<Item> = self
            .items
            .iter()
            .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let sort = self.sort;
        shown.sort_by(|a, b| sort.compare(a, b));
        if self.reversed {
            shown.reverse();
        }

        debug!(
            shown = shown.len(),
            total = self.items.len(),
            sort = ?self.sort,
            reversed = self.reversed,
            "display list rebuilt"
        );

        self.displayed = shown;
        let ids = self.displayed.iter().map(|item| item.path.clone()).collect();
        self.selection.set_displayed(ids);
    }
}

fn listing_changed(old: &[Item], new: &[Item]) -> bool {
    if old.len() != new.len() {
        return true;
    }
    let fresh: HashMap<&str, &Item> = new.iter().map(|item| (item.path.as_str(), item)).collect();
    old.iter().any(|item| match fresh.get(item.path.as_str()) {
        Some(other) => other.modified != item.modified,
        None => true,
    })
}
