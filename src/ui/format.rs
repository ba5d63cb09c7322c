/// Display formatting for card captions
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Turn a generator file name into a caption.
///
/// The extension is dropped, underscores become spaces and a trailing
/// counter is shown as "#N": "ComfyUI_00012.png" becomes "ComfyUI #00012".
pub fn format_filename(name: &str) -> String {
    // Only a non-empty suffix counts, so "name." keeps its dot and ".png" is all extension
    let stem = match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot..].contains('/') => &name[..dot],
        _ => name,
    };
    let spaced = stem.replace('_', " ");

    let counter_len = spaced.len() - spaced.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let caption = if counter_len > 0 {
        let (head, counter) = spaced.split_at(spaced.len() - counter_len);
        format!("{} #{}", head.trim_end(), counter)
    } else {
        spaced
    };

    caption.trim().to_string()
}

/// Short timestamp such as "Oct 19, 07:05 PM"
pub fn format_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    date.format("%b %-d, %I:%M %p").to_string()
}
