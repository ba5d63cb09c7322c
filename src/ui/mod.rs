/// Gallery widgets
pub mod card;
pub mod format;
pub mod toolbar;
