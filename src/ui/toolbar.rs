/// Header bar: sorting, search, folder controls and the selection actions
use iced::widget::{button, container, row, text, text_input, tooltip, Space};
use iced::{Alignment, Element, Length};

use crate::Message;
use xo_gallery::state::gallery::{Gallery, SortCriteria};
use xo_gallery::state::selection::SelectionSummary;

pub fn view<'a>(gallery: &'a Gallery, connected: bool) -> Element<'a, Message> {
    let mut sorts = row![].spacing(4).align_y(Alignment::Center);
    for criteria in SortCriteria::ALL {
        let style = if gallery.sort() == criteria {
            button::primary
        } else {
            button::secondary
        };
        sorts = sorts.push(
            button(text(criteria.label()))
                .on_press(Message::SortChosen(criteria))
                .style(style),
        );
    }

    let reverse_label = if gallery.is_reversed() { "Reversed" } else { "Reverse" };

    let status = if connected { "Connected" } else { "Disconnected" };

    row![
        sorts,
        button(text(reverse_label)).on_press(Message::ToggleReverse),
        text_input("Search...", gallery.search())
            .on_input(Message::SearchChanged)
            .width(Length::Fixed(240.0)),
        Space::with_width(Length::Fill),
        button(text("Refresh")).on_press(Message::Refresh),
        button(text("Open Folder")).on_press(Message::PickFolder),
        text(status).size(14),
    ]
    .spacing(10)
    .padding(10)
    .align_y(Alignment::Center)
    .into()
}

/// Count, delete and clear; hidden content when nothing is selected
pub fn selection_actions<'a>(summary: &SelectionSummary) -> Element<'a, Message> {
    let delete = button(text("Delete"))
        .style(button::danger)
        .on_press_maybe(summary.actions_enabled.then_some(Message::DeleteSelected));

    let clear = button(text("Clear"))
        .style(button::secondary)
        .on_press_maybe(summary.actions_enabled.then_some(Message::ClearSelection));

    let label = if summary.actions_enabled {
        format!("Selected {}", summary.count_label)
    } else {
        String::new()
    };

    container(
        row![
            text(label).size(14),
            tooltip(
                delete,
                text(summary.delete_hint.clone()).size(12),
                tooltip::Position::Bottom
            ),
            clear,
        ]
        .spacing(10)
        .align_y(Alignment::Center),
    )
    .padding([0, 10])
    .into()
}
