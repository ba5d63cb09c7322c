/// State management module
///
/// This module handles all gallery state, including:
/// - Shared data structures (data.rs)
/// - Multi-select bookkeeping (selection.rs)
/// - Sorting, search and the display order (gallery.rs)
/// - The cached listing (library.rs)
/// - Arrivals since the last refresh (new_items.rs)

pub mod data;
pub mod gallery;
pub mod library;
pub mod new_items;
pub mod selection;
