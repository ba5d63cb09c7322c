/// Output directory access
///
/// This module handles:
/// - Listing images and text files below the output directory
/// - Deleting and renaming items

pub mod ops;
pub mod scan;
