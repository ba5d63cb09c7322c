/// Multi-select bookkeeping for the gallery grid
///
/// Selection follows the usual desktop conventions: plain click selects one
/// card, Ctrl/Cmd-click toggles, Shift-click selects a contiguous range from
/// the anchor, Ctrl/Cmd+A toggles everything, and clicking empty space or
/// pressing Escape clears.
///
/// `SelectionState::apply` is a pure transition so the rules can be tested
/// without a window. `SelectionController` owns the state together with the
/// current display order and notifies subscribers after every change.
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Modifier keys held during a click
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Ctrl on Linux/Windows, Cmd on macOS
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { ctrl: false, shift: false };
    pub const CTRL: Modifiers = Modifiers { ctrl: true, shift: false };
    pub const SHIFT: Modifiers = Modifiers { ctrl: false, shift: true };

    pub fn any(&self) -> bool {
        self.ctrl || self.shift
    }
}

/// Where a click that did not hit a card landed; card presses go to `click`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// The selection action bar (count, delete button)
    SelectionActions,
    /// Anything else: empty grid space, headers, margins
    Elsewhere,
}

/// A user gesture that may change the selection
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gesture {
    Click {
        id: String,
        index: usize,
        modifiers: Modifiers,
    },
    ToggleSelectAll,
    Clear,
    OutsideClick {
        target: ClickTarget,
        modifiers: Modifiers,
    },
    /// Items left the display (deleted, renamed, filtered out)
    Evict(Vec<String>),
}

/// Selected ids plus the anchor of the current range gesture.
///
/// The anchor is remembered by id, so a re-sort moves it together with its
/// card. When present it is always a member of the selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: HashSet<String>,
    anchor: Option<String>,
}

impl SelectionState {
    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Position of the anchor card in `displayed`
    pub fn anchor_index(&self, displayed: &[String]) -> Option<usize> {
        let anchor = self.anchor.as_deref()?;
        displayed.iter().position(|id| id == anchor)
    }

    /// Compute the state that follows `gesture`, given the current display order
    pub fn apply(&self, gesture: &Gesture, displayed: &[String]) -> SelectionState {
        let mut next = self.clone();
        match gesture {
            Gesture::Click { id, index, modifiers } => {
                if modifiers.ctrl {
                    next.toggle(id, displayed);
                } else if modifiers.shift {
                    next.extend_range(id, *index, displayed);
                } else {
                    next.select_single(id);
                }
            }
            Gesture::ToggleSelectAll => {
                if displayed.iter().all(|id| next.selected.contains(id)) {
                    next = SelectionState::default();
                } else {
                    next.selected = displayed.iter().cloned().collect();
                    next.anchor = None;
                }
            }
            Gesture::Clear => next = SelectionState::default(),
            Gesture::OutsideClick { target, modifiers } => {
                if *target == ClickTarget::Elsewhere && !modifiers.any() {
                    next = SelectionState::default();
                }
            }
            Gesture::Evict(ids) => {
                for id in ids {
                    next.selected.remove(id);
                }
                next.repair_anchor(displayed);
            }
        }
        next
    }

    fn select_single(&mut self, id: &str) {
        self.selected.clear();
        self.selected.insert(id.to_string());
        self.anchor = Some(id.to_string());
    }

    fn toggle(&mut self, id: &str, displayed: &[String]) {
        if self.selected.remove(id) {
            self.repair_anchor(displayed);
        } else {
            self.selected.insert(id.to_string());
            if self.anchor.is_none() {
                self.anchor = Some(id.to_string());
            }
        }
    }

    fn extend_range(&mut self, id: &str, index: usize, displayed: &[String]) {
        let Some(anchor) = self.anchor_index(displayed) else {
            self.select_single(id);
            return;
        };
        if displayed.is_empty() {
            return;
        }
        let lo = anchor.min(index);
        let hi = anchor.max(index).min(displayed.len() - 1);
        self.selected = displayed[lo..=hi].iter().cloned().collect();
    }

    /// Move the anchor to the first selected card in display order when the
    /// anchor card is no longer selected.
    fn repair_anchor(&mut self, displayed: &[String]) {
        let anchor_alive = self
            .anchor
            .as_ref()
            .is_some_and(|anchor| self.selected.contains(anchor));
        if anchor_alive {
            return;
        }
        self.anchor = displayed
            .iter()
            .find(|id| self.selected.contains(*id))
            .cloned();
    }
}

/// What the selection action bar shows
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionSummary {
    pub count: usize,
    /// Delete and friends are only clickable with something selected
    pub actions_enabled: bool,
    /// "(3)", empty when nothing is selected
    pub count_label: String,
    /// Tooltip for the delete button
    pub delete_hint: String,
}

impl SelectionSummary {
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            return Self {
                count,
                actions_enabled: false,
                count_label: String::new(),
                delete_hint: "Select images to delete".to_string(),
            };
        }
        Self {
            count,
            actions_enabled: true,
            count_label: format!("({})", count),
            delete_hint: format!("Delete {} selected", pluralize(count, "image")),
        }
    }
}

/// "1 image", "2 images"
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Snapshot handed to subscribers after every change
#[derive(Debug)]
pub struct SelectionChange<'a> {
    pub selected: &'a HashSet<String>,
    pub anchor_index: Option<usize>,
    pub summary: SelectionSummary,
}

pub type SubscriptionId = usize;

type Subscriber = Box<dyn FnMut(&SelectionChange<'_>)>;

/// Owns the selection for one gallery view
pub struct SelectionController {
    state: SelectionState,
    /// Ids of the displayed items, in display order
    displayed: Vec<String>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            state: SelectionState::default(),
            displayed: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Register a callback run after every change
    pub fn subscribe(&mut self, callback: impl FnMut(&SelectionChange<'_>) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> &HashSet<String> {
        self.state.selected()
    }

    /// Selected ids in display order, for bulk actions
    pub fn selected_in_order(&self) -> Vec<String> {
        self.displayed
            .iter()
            .filter(|id| self.state.is_selected(id))
            .cloned()
            .collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.state.is_selected(id)
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn anchor_index(&self) -> Option<usize> {
        self.state.anchor_index(&self.displayed)
    }

    pub fn displayed(&self) -> &[String] {
        &self.displayed
    }

    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary::from_count(self.state.len())
    }

    /// Replace the display order; selected ids that are no longer shown are evicted
    pub fn set_displayed(&mut self, ids: Vec<String>) -> bool {
        let shown: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let gone: Vec<String> = self
            .state
            .selected()
            .iter()
            .filter(|id| !shown.contains(id.as_str()))
            .cloned()
            .collect();
        self.displayed = ids;
        self.dispatch(Gesture::Evict(gone))
    }

    pub fn click(&mut self, id: &str, index: usize, modifiers: Modifiers) -> bool {
        self.dispatch(Gesture::Click {
            id: id.to_string(),
            index,
            modifiers,
        })
    }

    pub fn toggle_select_all(&mut self) -> bool {
        self.dispatch(Gesture::ToggleSelectAll)
    }

    pub fn clear(&mut self) -> bool {
        self.dispatch(Gesture::Clear)
    }

    pub fn escape(&mut self) -> bool {
        self.clear()
    }

    pub fn outside_click(&mut self, target: ClickTarget, modifiers: Modifiers) -> bool {
        self.dispatch(Gesture::OutsideClick { target, modifiers })
    }

    pub fn evict<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch(Gesture::Evict(ids.into_iter().map(Into::into).collect()))
    }

    /// Apply a gesture; returns whether the selection changed
    pub fn dispatch(&mut self, gesture: Gesture) -> bool {
        let next = self.state.apply(&gesture, &self.displayed);
        if next == self.state {
            return false;
        }
        self.state = next;
        debug!(
            selected = self.state.len(),
            anchor = ?self.state.anchor_index(&self.displayed),
            "selection changed"
        );
        self.notify();
        true
    }

    fn notify(&mut self) {
        let change = SelectionChange {
            selected: &self.state.selected,
            anchor_index: self.state.anchor_index(&self.displayed),
            summary: SelectionSummary::from_count(self.state.len()),
        };
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&change);
        }
    }
}

impl fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionController")
            .field("state", &self.state)
            .field("displayed", &self.displayed.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
