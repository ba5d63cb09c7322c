//! Gallery core: item model, multi-select, display order, listing cache and
//! output directory access. The iced front-end lives in the binary.

pub mod config;
pub mod error;
pub mod media;
pub mod state;

pub use error::{GalleryError, Result};
