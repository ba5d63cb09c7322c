/// One gallery card: thumbnail, caption and per-item actions
use chrono::Local;
use iced::widget::{button, column, container, image, mouse_area, row, text};
use iced::{Alignment, Border, Color, Element, Length, Theme};
use std::path::Path;

use super::format::{format_date, format_filename};
use crate::Message;
use xo_gallery::state::data::{Item, ItemKind};

/// Edge length of the square thumbnail area
pub const THUMBNAIL_SIZE: f32 = 180.0;

const NEW_ITEM_SIZE: f32 = 120.0;

pub fn view<'a>(item: &'a Item, root: &Path, selected: bool) -> Element<'a, Message> {
    let modified = item.modified.with_timezone(&Local);

    let actions = row![
        button(text("View").size(12))
            .on_press(Message::OpenPreview(item.path.clone()))
            .style(button::text),
        button(text("Rename").size(12))
            .on_press(Message::StartRename(item.path.clone()))
            .style(button::text),
    ]
    .spacing(4);

    let content = column![
        thumbnail(item, root, THUMBNAIL_SIZE),
        text(format_filename(&item.name)).size(14),
        text(format_date(&modified)).size(12),
        actions,
    ]
    .spacing(4)
    .align_x(Alignment::Start)
    .width(Length::Fixed(THUMBNAIL_SIZE));

    let card = container(content)
        .padding(6)
        .style(move |theme: &Theme| card_style(theme, selected));

    mouse_area(card)
        .on_press(Message::CardPressed(item.path.clone()))
        .into()
}

/// Smaller card for the new-items overlay; a press toggles its pick
pub fn new_item_view<'a>(item: &'a Item, root: &Path, picked: bool) -> Element<'a, Message> {
    let modified = item.modified.with_timezone(&Local);

    let content = column![
        thumbnail(item, root, NEW_ITEM_SIZE),
        text(format_filename(&item.name)).size(12),
        text(format_date(&modified)).size(11),
    ]
    .spacing(4)
    .width(Length::Fixed(NEW_ITEM_SIZE));

    let card = container(content)
        .padding(4)
        .style(move |theme: &Theme| card_style(theme, picked));

    mouse_area(card)
        .on_press(Message::NewItemToggled(item.path.clone()))
        .into()
}

fn thumbnail<'a>(item: &Item, root: &Path, size: f32) -> Element<'a, Message> {
    match item.kind {
        ItemKind::Image => image(image::Handle::from_path(root.join(&item.path)))
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into(),
        ItemKind::Text => container(text("TXT").size(size / 6.0))
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .center_x(Length::Fixed(size))
            .center_y(Length::Fixed(size))
            .into(),
    }
}

fn card_style(theme: &Theme, selected: bool) -> container::Style {
    let palette = theme.extended_palette();
    let border_color = if selected {
        palette.primary.strong.color
    } else {
        Color::TRANSPARENT
    };

    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            color: border_color,
            width: 3.0,
            radius: 6.0.into(),
        },
        ..container::Style::default()
    }
}
