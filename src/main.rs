use iced::event::{self, Event};
use iced::keyboard::{self, key, Key};
use iced::widget::{button, column, container, image, mouse_area, row, scrollable, text, text_input, Space};
use iced::{time, window, Alignment, Element, Length, Subscription, Task, Theme};
use iced_aw::Wrap;
use rfd::FileDialog;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use xo_gallery::config::Settings;
use xo_gallery::media::{ops, scan};
use xo_gallery::state::data::{DeleteReport, Item, ItemKind};
use xo_gallery::state::gallery::{Gallery, SortCriteria};
use xo_gallery::state::library::Library;
use xo_gallery::state::new_items::NewItems;
use xo_gallery::state::selection::{pluralize, ClickTarget, Modifiers, SelectionSummary};

mod ui;

/// How often stale cached listings are dropped
const CACHE_PRUNE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// What covers the grid, if anything
#[derive(Debug, Clone, PartialEq)]
enum Overlay {
    None,
    /// Waiting for the user to confirm deleting these ids
    ConfirmDelete { ids: Vec<String>, scope: DeleteScope },
    Rename { id: String, input: String },
    Preview { id: String, text: Option<String> },
    /// Cards that arrived since the last refresh
    NewItems,
}

/// Which pick set a delete batch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteScope {
    Selection,
    NewItems,
}

/// Main application state
struct GalleryApp {
    settings: Settings,
    /// Listing cache; the gallery still works without it
    library: Option<Library>,
    gallery: Gallery,
    /// Kept in sync by a selection subscriber, read by the action bar
    summary: Rc<RefCell<SelectionSummary>>,
    modifiers: Modifiers,
    overlay: Overlay,
    /// Toast line
    status: String,
    /// Whether the last scan could read the output directory
    connected: bool,
    scanning: bool,
    /// Items that showed up in recent refreshes, until dismissed
    new_items: NewItems,
}

/// Application messages (events)
#[derive(Debug, Clone, PartialEq)]
enum Message {
    Refresh,
    /// Listing of the given output folder
    ScanComplete(PathBuf, Result<Vec<Item>, String>),
    PickFolder,
    PruneCache,

    CardPressed(String),
    /// A press that no card or button took
    Pressed(ClickTarget),
    ModifiersChanged(Modifiers),
    SelectAll,
    ClearSelection,
    Escape,

    SortChosen(SortCriteria),
    ToggleReverse,
    SearchChanged(String),

    DeleteSelected,
    ConfirmDelete,
    DeleteComplete(DeleteScope, Result<DeleteReport, String>),

    StartRename(String),
    RenameInput(String),
    ConfirmRename,
    RenameComplete(String, Result<Item, String>),

    OpenPreview(String),
    PreviewStep(isize),
    PreviewText(String, Result<String, String>),

    ShowNewItems,
    NewItemToggled(String),
    PickAllNew,
    DeleteNewItems,
    DismissNewItems,
    CloseOverlay,
}

impl GalleryApp {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();

        let library = match Library::open_default() {
            Ok(library) => Some(library),
            Err(e) => {
                warn!(error = %e, "listing cache unavailable");
                None
            }
        };

        let mut app = Self::from_settings(settings, library);
        let task = app.rescan();
        (app, task)
    }

    /// Build the initial state; the cached listing is shown until a scan lands
    fn from_settings(settings: Settings, library: Option<Library>) -> Self {
        let summary = Rc::new(RefCell::new(SelectionSummary::from_count(0)));
        let mut gallery = new_gallery(settings.sort, &summary);

        // Show the cached listing right away; the first scan replaces it
        if let Some(library) = &library {
            match library.load_listing(settings.cache_max_age()) {
                Ok(Some(items)) => {
                    info!(count = items.len(), "showing cached listing");
                    gallery.replace_items(items);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "failed to read listing cache"),
            }
        }

        let status = match &settings.output_dir {
            Some(dir) => format!("Watching {}", dir.display()),
            None => "Open a folder to start.".to_string(),
        };

        GalleryApp {
            settings,
            library,
            gallery,
            summary,
            modifiers: Modifiers::NONE,
            overlay: Overlay::None,
            status,
            connected: true,
            scanning: false,
            new_items: NewItems::default(),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Refresh => self.rescan(),
            Message::ScanComplete(root, result) => {
                if self.settings.output_dir.as_ref() != Some(&root) {
                    warn!(root = %root.display(), "dropping listing of a previous output folder");
                    return Task::none();
                }
                self.scanning = false;
                self.handle_scan(result);
                Task::none()
            }
            Message::PickFolder => {
                let folder = FileDialog::new()
                    .set_title("Select Output Folder")
                    .pick_folder();

                let Some(folder) = folder else {
                    return Task::none();
                };

                info!(folder = %folder.display(), "output folder chosen");
                let task = self.switch_folder(folder);
                self.save_settings();
                task
            }
            Message::PruneCache => {
                if let Some(library) = &self.library {
                    if let Err(e) = library.prune(self.settings.cache_max_age()) {
                        warn!(error = %e, "failed to prune listing cache");
                    }
                }
                Task::none()
            }

            Message::CardPressed(id) => {
                self.gallery.click(&id, self.modifiers);
                Task::none()
            }
            Message::Pressed(target) => {
                if self.overlay == Overlay::None {
                    self.gallery.selection_mut().outside_click(target, self.modifiers);
                }
                Task::none()
            }
            Message::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers;
                Task::none()
            }
            Message::SelectAll => {
                if self.overlay == Overlay::None {
                    self.gallery.selection_mut().toggle_select_all();
                }
                Task::none()
            }
            Message::ClearSelection => {
                self.gallery.selection_mut().clear();
                Task::none()
            }
            Message::Escape => {
                self.gallery.selection_mut().escape();
                if self.overlay == Overlay::NewItems {
                    self.new_items = NewItems::default();
                }
                self.overlay = Overlay::None;
                Task::none()
            }

            Message::SortChosen(sort) => {
                self.gallery.set_sort(sort);
                self.settings.sort = sort;
                self.save_settings();
                Task::none()
            }
            Message::ToggleReverse => {
                self.gallery.toggle_reversed();
                Task::none()
            }
            Message::SearchChanged(term) => {
                self.gallery.set_search(&term);
                Task::none()
            }

            Message::DeleteSelected => {
                let ids = self.gallery.selection().selected_in_order();
                if !ids.is_empty() {
                    self.overlay = Overlay::ConfirmDelete {
                        ids,
                        scope: DeleteScope::Selection,
                    };
                }
                Task::none()
            }
            Message::ConfirmDelete => {
                let Overlay::ConfirmDelete { ids, scope } = std::mem::replace(&mut self.overlay, Overlay::None) else {
                    return Task::none();
                };
                if scope == DeleteScope::NewItems {
                    self.overlay = Overlay::NewItems;
                }
                let Some(root) = self.settings.output_dir.clone() else {
                    return Task::none();
                };
                info!(count = ids.len(), ?scope, "deleting items");
                Task::perform(ops::delete_items_async(root, ids), move |result| {
                    Message::DeleteComplete(scope, result.map_err(|e| e.to_string()))
                })
            }
            Message::DeleteComplete(scope, result) => {
                match result {
                    Ok(report) => {
                        self.status = report.message();
                        match scope {
                            DeleteScope::Selection => self.gallery.apply_deletions(&report),
                            DeleteScope::NewItems => {
                                self.new_items.apply_deletions(&report);
                                self.gallery.remove_items(&report.deleted);
                            }
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "batch deletion failed");
                        self.status = "Error deleting selected images".to_string();
                        if scope == DeleteScope::Selection {
                            self.gallery.selection_mut().clear();
                        }
                    }
                }
                self.close_empty_new_items();
                self.rescan()
            }

            Message::StartRename(id) => {
                if let Some(item) = self.gallery.item(&id) {
                    let input = std::path::Path::new(&item.name)
                        .file_stem()
                        .map(|stem| stem.to_string_lossy().to_string())
                        .unwrap_or_default();
                    self.overlay = Overlay::Rename { id, input };
                }
                Task::none()
            }
            Message::RenameInput(value) => {
                if let Overlay::Rename { input, .. } = &mut self.overlay {
                    *input = value;
                }
                Task::none()
            }
            Message::ConfirmRename => {
                let Overlay::Rename { id, input } = std::mem::replace(&mut self.overlay, Overlay::None) else {
                    return Task::none();
                };
                let Some(root) = self.settings.output_dir.clone() else {
                    return Task::none();
                };
                let old_id = id.clone();
                Task::perform(ops::rename_item_async(root, id, input), move |result| {
                    Message::RenameComplete(old_id.clone(), result.map_err(|e| e.to_string()))
                })
            }
            Message::RenameComplete(old_id, result) => match result {
                Ok(item) => {
                    self.status = format!("Renamed to {}", item.name);
                    self.gallery.apply_rename(&old_id, item);
                    self.rescan()
                }
                Err(e) => {
                    warn!(id = %old_id, error = %e, "rename failed");
                    self.status = format!("Failed to rename file: {}", e);
                    Task::none()
                }
            },

            Message::OpenPreview(id) => self.open_preview(id),
            Message::PreviewStep(step) => {
                let Overlay::Preview { id, .. } = &self.overlay else {
                    return Task::none();
                };
                match self.gallery.preview_neighbour(id, step) {
                    Some(next) => {
                        let next = next.path.clone();
                        self.open_preview(next)
                    }
                    None => Task::none(),
                }
            }
            Message::PreviewText(id, result) => {
                if let Overlay::Preview { id: current, text } = &mut self.overlay {
                    if *current == id {
                        *text = Some(result.unwrap_or_else(|e| format!("Could not read file: {}", e)));
                    }
                }
                Task::none()
            }

            Message::ShowNewItems => {
                if self.overlay == Overlay::None && !self.new_items.is_empty() {
                    self.overlay = Overlay::NewItems;
                }
                Task::none()
            }
            Message::NewItemToggled(id) => {
                self.new_items.toggle(&id);
                Task::none()
            }
            Message::PickAllNew => {
                self.new_items.pick_all();
                Task::none()
            }
            Message::DeleteNewItems => {
                let ids = self.new_items.picked_in_order();
                if !ids.is_empty() {
                    self.overlay = Overlay::ConfirmDelete {
                        ids,
                        scope: DeleteScope::NewItems,
                    };
                }
                Task::none()
            }
            Message::DismissNewItems => {
                self.new_items = NewItems::default();
                if self.overlay == Overlay::NewItems {
                    self.overlay = Overlay::None;
                }
                Task::none()
            }
            Message::CloseOverlay => {
                self.overlay = match self.overlay {
                    Overlay::ConfirmDelete {
                        scope: DeleteScope::NewItems,
                        ..
                    } => Overlay::NewItems,
                    _ => Overlay::None,
                };
                Task::none()
            }
        }
    }

    /// Point the gallery at another output folder and list it.
    ///
    /// A scan of the previous folder may still be running; its result carries
    /// the old root and is dropped when it lands.
    fn switch_folder(&mut self, folder: PathBuf) -> Task<Message> {
        if let Some(library) = &self.library {
            if let Err(e) = library.clear() {
                warn!(error = %e, "failed to clear listing cache");
            }
        }

        self.status = format!("Watching {}", folder.display());
        self.settings.output_dir = Some(folder);
        self.gallery = new_gallery(self.settings.sort, &self.summary);
        *self.summary.borrow_mut() = SelectionSummary::from_count(0);
        self.new_items = NewItems::default();
        self.overlay = Overlay::None;

        self.scanning = false;
        self.rescan()
    }

    /// Start a background listing of the output directory
    fn rescan(&mut self) -> Task<Message> {
        if self.scanning {
            return Task::none();
        }
        let Some(root) = self.settings.output_dir.clone() else {
            return Task::none();
        };

        self.scanning = true;
        Task::perform(scan::scan_output_dir(root.clone()), move |result| {
            Message::ScanComplete(root.clone(), result.map_err(|e| e.to_string()))
        })
    }

    fn handle_scan(&mut self, result: Result<Vec<Item>, String>) {
        match result {
            Ok(items) => {
                self.connected = true;
                let outcome = self.gallery.replace_items(items);
                if !outcome.changed {
                    return;
                }

                if let Some(library) = &mut self.library {
                    if let Err(e) = library.save_listing(self.gallery.items()) {
                        warn!(error = %e, "failed to cache listing");
                    }
                }

                self.new_items.retain_known(self.gallery.items());
                if !outcome.new_items.is_empty() {
                    self.status = format!(
                        "{} added",
                        pluralize(outcome.new_items.len(), "new image")
                    );
                    self.new_items.extend(outcome.new_items);
                    if self.overlay == Overlay::None {
                        self.overlay = Overlay::NewItems;
                    }
                }
                self.close_empty_new_items();
            }
            Err(e) => {
                error!(error = %e, "error loading output directory");
                self.connected = false;

                if !self.gallery.items().is_empty() {
                    return;
                }
                let cached = self
                    .library
                    .as_ref()
                    .and_then(|library| library.load_listing(self.settings.cache_max_age()).ok())
                    .flatten();
                if let Some(items) = cached {
                    info!(count = items.len(), "falling back to cached listing");
                    self.gallery.replace_items(items);
                }
            }
        }
    }

    fn close_empty_new_items(&mut self) {
        if self.overlay == Overlay::NewItems && self.new_items.is_empty() {
            self.overlay = Overlay::None;
        }
    }

    fn open_preview(&mut self, id: String) -> Task<Message> {
        let Some(item) = self.gallery.item(&id) else {
            return Task::none();
        };
        let kind = item.kind;
        self.overlay = Overlay::Preview {
            id: id.clone(),
            text: None,
        };

        match (kind, self.output_path(&id)) {
            (ItemKind::Text, Some(path)) => Task::perform(tokio::fs::read_to_string(path), move |result| {
                Message::PreviewText(id.clone(), result.map_err(|e| e.to_string()))
            }),
            _ => Task::none(),
        }
    }

    fn output_path(&self, id: &str) -> Option<PathBuf> {
        let root = self.settings.output_dir.as_ref()?;
        ops::resolve(root, id).ok()
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save() {
            warn!(error = %e, "failed to save settings");
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let summary = self.summary.borrow().clone();

        // Presses on the action bar must not count as outside clicks
        let actions = mouse_area(ui::toolbar::selection_actions(&summary))
            .on_press(Message::Pressed(ClickTarget::SelectionActions));

        let mut content = column![ui::toolbar::view(&self.gallery, self.connected), actions].spacing(6);

        if !self.new_items.is_empty() && self.overlay != Overlay::NewItems {
            content = content.push(
                row![
                    text(format!("{} since last refresh", pluralize(self.new_items.len(), "new image"))).size(14),
                    button(text("Show")).on_press(Message::ShowNewItems),
                    button(text("Dismiss")).on_press(Message::DismissNewItems),
                ]
                .spacing(10)
                .padding([0, 10])
                .align_y(Alignment::Center),
            );
        }

        let body = match &self.overlay {
            Overlay::None => self.grid_view(),
            Overlay::ConfirmDelete { ids, .. } => self.confirm_delete_view(ids.len()),
            Overlay::Rename { input, .. } => self.rename_view(input),
            Overlay::Preview { id, text } => self.preview_view(id, text.as_deref()),
            Overlay::NewItems => self.new_items_view(),
        };

        let page = content
            .push(body)
            .push(container(text(&self.status).size(14)).padding([4, 10]))
            .width(Length::Fill)
            .height(Length::Fill);

        // Cards, buttons and inputs capture their own presses
        mouse_area(page)
            .on_press(Message::Pressed(ClickTarget::Elsewhere))
            .into()
    }

    fn grid_view(&self) -> Element<Message> {
        let displayed = self.gallery.displayed();

        let inner: Element<Message> = match &self.settings.output_dir {
            Some(_) if displayed.is_empty() => {
                let message = if self.gallery.search().is_empty() {
                    "No images found in the output directory"
                } else {
                    "No images match the search"
                };
                container(text(message)).padding(20).into()
            }
            Some(root) => {
                let selection = self.gallery.selection();
                let cards = displayed
                    .iter()
                    .map(|item| ui::card::view(item, root, selection.is_selected(&item.path)))
                    .collect();
                scrollable(
                    container(Wrap::with_elements(cards).spacing(12.0).line_spacing(12.0))
                        .padding(10)
                        .width(Length::Fill),
                )
                .into()
            }
            None => container(button(text("Open Folder")).on_press(Message::PickFolder))
                .padding(20)
                .into(),
        };

        container(inner).width(Length::Fill).height(Length::Fill).into()
    }

    fn confirm_delete_view(&self, count: usize) -> Element<Message> {
        let prompt = format!(
            "Are you sure you want to delete {}? This action cannot be undone.",
            pluralize(count, "selected image")
        );
        dialog(
            column![
                text(prompt),
                row![
                    button(text("Delete")).style(button::danger).on_press(Message::ConfirmDelete),
                    button(text("Cancel")).style(button::secondary).on_press(Message::CloseOverlay),
                ]
                .spacing(10),
            ]
            .spacing(16)
            .into(),
        )
    }

    fn new_items_view(&self) -> Element<Message> {
        let Some(root) = &self.settings.output_dir else {
            return dialog(button(text("Close")).on_press(Message::DismissNewItems).into());
        };

        let cards = self
            .new_items
            .items()
            .iter()
            .map(|item| ui::card::new_item_view(item, root, self.new_items.is_picked(&item.path)))
            .collect();

        let picked = self.new_items.picked_count();
        let delete_label = if picked == 0 {
            "Delete Selected".to_string()
        } else {
            format!("Delete Selected ({})", picked)
        };

        column![
            row![
                text(format!("{} added", pluralize(self.new_items.len(), "new image"))).size(18),
                Space::with_width(Length::Fill),
                button(text("Select All")).on_press(Message::PickAllNew),
                button(text(delete_label))
                    .style(button::danger)
                    .on_press_maybe((picked > 0).then_some(Message::DeleteNewItems)),
                button(text("Close")).style(button::secondary).on_press(Message::DismissNewItems),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
            scrollable(
                container(Wrap::with_elements(cards).spacing(8.0).line_spacing(8.0)).width(Length::Fill),
            )
            .height(Length::Fill),
        ]
        .spacing(10)
        .padding(10)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn rename_view(&self, input: &str) -> Element<Message> {
        dialog(
            column![
                text("Rename"),
                text_input("New name", input)
                    .on_input(Message::RenameInput)
                    .on_submit(Message::ConfirmRename)
                    .width(Length::Fixed(320.0)),
                row![
                    button(text("Rename")).on_press(Message::ConfirmRename),
                    button(text("Cancel")).style(button::secondary).on_press(Message::CloseOverlay),
                ]
                .spacing(10),
            ]
            .spacing(16)
            .into(),
        )
    }

    fn preview_view(&self, id: &str, contents: Option<&str>) -> Element<Message> {
        let Some(item) = self.gallery.item(id) else {
            return dialog(button(text("Close")).on_press(Message::CloseOverlay).into());
        };

        let shown: Element<Message> = match (item.kind, self.output_path(id)) {
            (ItemKind::Image, Some(path)) => image(image::Handle::from_path(path))
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            (ItemKind::Text, _) => scrollable(text(contents.unwrap_or("Loading...").to_string()))
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            _ => text("File unavailable").into(),
        };

        let modified = item.modified.with_timezone(&chrono::Local);
        column![
            row![
                button(text("Previous")).on_press(Message::PreviewStep(-1)),
                text(ui::format::format_filename(&item.name)).size(18),
                text(ui::format::format_date(&modified)).size(14),
                button(text("Next")).on_press(Message::PreviewStep(1)),
                button(text("Close")).style(button::secondary).on_press(Message::CloseOverlay),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
            shown,
        ]
        .spacing(10)
        .padding(10)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            event::listen_with(handle_event),
            time::every(self.settings.refresh_interval()).map(|_| Message::Refresh),
            time::every(CACHE_PRUNE_INTERVAL).map(|_| Message::PruneCache),
        ])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Fresh gallery whose selection changes feed the shared action bar summary
fn new_gallery(sort: SortCriteria, summary: &Rc<RefCell<SelectionSummary>>) -> Gallery {
    let mut gallery = Gallery::new(sort);
    let sink = Rc::clone(summary);
    gallery.selection_mut().subscribe(move |change| {
        *sink.borrow_mut() = change.summary.clone();
    });
    gallery
}

fn dialog(content: Element<Message>) -> Element<Message> {
    container(container(content).padding(24).style(container::bordered_box))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// Global keyboard shortcuts
fn handle_event(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    let Event::Keyboard(keyboard_event) = event else {
        return None;
    };

    match keyboard_event {
        keyboard::Event::ModifiersChanged(modifiers) => Some(Message::ModifiersChanged(click_modifiers(modifiers))),
        keyboard::Event::KeyPressed { key, modifiers, .. } => match key.as_ref() {
            Key::Named(key::Named::Escape) => Some(Message::Escape),
            // Leave Ctrl+A alone while a text field has it
            Key::Character("a") if modifiers.command() && status == event::Status::Ignored => {
                Some(Message::SelectAll)
            }
            Key::Named(key::Named::ArrowLeft) if status == event::Status::Ignored => {
                Some(Message::PreviewStep(-1))
            }
            Key::Named(key::Named::ArrowRight) if status == event::Status::Ignored => {
                Some(Message::PreviewStep(1))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Ctrl and Cmd both count as the toggle modifier
fn click_modifiers(modifiers: keyboard::Modifiers) -> Modifiers {
    Modifiers {
        ctrl: modifiers.command() || modifiers.control(),
        shift: modifiers.shift(),
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    iced::application("xO Gallery", GalleryApp::update, GalleryApp::view)
        .subscription(GalleryApp::subscription)
        .theme(GalleryApp::theme)
        .centered()
        .run_with(GalleryApp::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use iced::keyboard::key::{Code, Physical};

    const ROOT: &str = "/srv/renders";

    fn item(path: &str) -> Item {
        Item {
            path: path.to_string(),
            name: path.to_string(),
            modified: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            size: 10,
            kind: ItemKind::Image,
        }
    }

    fn app_at(root: &str) -> GalleryApp {
        let settings = Settings {
            output_dir: Some(PathBuf::from(root)),
            ..Settings::default()
        };
        GalleryApp::from_settings(settings, None)
    }

    fn scanned(app: &mut GalleryApp, root: &str, paths: &[&str]) {
        let items = paths.iter().map(|path| item(path)).collect();
        let _ = app.update(Message::ScanComplete(PathBuf::from(root), Ok(items)));
    }

    fn shown(app: &GalleryApp) -> Vec<&str> {
        app.gallery.displayed().iter().map(|item| item.path.as_str()).collect()
    }

    fn press(key: Key, modifiers: keyboard::Modifiers) -> Event {
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: key.clone(),
            modified_key: key,
            physical_key: Physical::Code(Code::KeyA),
            location: keyboard::Location::Standard,
            modifiers,
            text: None,
        })
    }

    fn map(event: Event, status: event::Status) -> Option<Message> {
        handle_event(event, status, window::Id::unique())
    }

    #[test]
    fn test_scan_of_previous_folder_is_dropped() {
        let mut app = app_at("/srv/old");
        let _ = app.rescan();
        assert!(app.scanning);

        let _ = app.switch_folder(PathBuf::from("/srv/new"));
        assert!(app.scanning);

        scanned(&mut app, "/srv/old", &["old_only.png"]);
        assert!(app.gallery.items().is_empty());
        assert!(app.scanning);

        scanned(&mut app, "/srv/new", &["fresh.png"]);
        assert_eq!(shown(&app), ["fresh.png"]);
        assert!(!app.scanning);
    }

    #[test]
    fn test_failed_delete_still_clears_selection() {
        let mut app = app_at(ROOT);
        scanned(&mut app, ROOT, &["a.png", "b.png", "c.png"]);

        let _ = app.update(Message::CardPressed("a.png".into()));
        let _ = app.update(Message::ModifiersChanged(Modifiers::SHIFT));
        let _ = app.update(Message::CardPressed("c.png".into()));
        assert_eq!(app.gallery.selection().len(), 3);
        assert_eq!(app.summary.borrow().count, 3);

        let _ = app.update(Message::DeleteComplete(DeleteScope::Selection, Err("worker gone".into())));
        assert!(app.gallery.selection().is_empty());
        assert_eq!(app.summary.borrow().count, 0);
        assert_eq!(shown(&app).len(), 3);
    }

    #[test]
    fn test_outside_press_clears_unless_on_actions() {
        let mut app = app_at(ROOT);
        scanned(&mut app, ROOT, &["a.png", "b.png"]);
        let _ = app.update(Message::CardPressed("b.png".into()));

        let _ = app.update(Message::Pressed(ClickTarget::SelectionActions));
        assert_eq!(app.gallery.selection().len(), 1);

        app.overlay = Overlay::Rename {
            id: "b.png".into(),
            input: "b".into(),
        };
        let _ = app.update(Message::Pressed(ClickTarget::Elsewhere));
        assert_eq!(app.gallery.selection().len(), 1);

        app.overlay = Overlay::None;
        let _ = app.update(Message::Pressed(ClickTarget::Elsewhere));
        assert!(app.gallery.selection().is_empty());
    }

    #[test]
    fn test_new_items_overlay_picks_and_deletes() {
        let mut app = app_at(ROOT);
        scanned(&mut app, ROOT, &["a.png"]);
        assert_eq!(app.overlay, Overlay::None);
        let _ = app.update(Message::CardPressed("a.png".into()));

        scanned(&mut app, ROOT, &["a.png", "b.png", "c.png"]);
        assert_eq!(app.overlay, Overlay::NewItems);
        assert_eq!(app.new_items.len(), 2);

        let _ = app.update(Message::NewItemToggled("b.png".into()));
        let _ = app.update(Message::DeleteNewItems);
        assert_eq!(
            app.overlay,
            Overlay::ConfirmDelete {
                ids: vec!["b.png".into()],
                scope: DeleteScope::NewItems,
            }
        );
        let _ = app.update(Message::CloseOverlay);
        assert_eq!(app.overlay, Overlay::NewItems);

        let _ = app.update(Message::PickAllNew);
        let _ = app.update(Message::DeleteNewItems);
        let _ = app.update(Message::ConfirmDelete);
        assert_eq!(app.overlay, Overlay::NewItems);

        let report = DeleteReport {
            deleted: vec!["b.png".into(), "c.png".into()],
            failed: Vec::new(),
        };
        let _ = app.update(Message::DeleteComplete(DeleteScope::NewItems, Ok(report)));

        assert!(app.new_items.is_empty());
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(shown(&app), ["a.png"]);
        assert!(app.gallery.selection().is_selected("a.png"));
    }

    #[test]
    fn test_escape_dismisses_new_items() {
        let mut app = app_at(ROOT);
        scanned(&mut app, ROOT, &["a.png"]);
        scanned(&mut app, ROOT, &["a.png", "b.png"]);
        assert_eq!(app.overlay, Overlay::NewItems);

        let _ = app.update(Message::Escape);
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.new_items.is_empty());
    }

    #[test]
    fn test_select_all_shortcut_yields_to_text_input() {
        let ctrl_a = press(Key::Character("a".into()), keyboard::Modifiers::COMMAND);
        assert_eq!(map(ctrl_a.clone(), event::Status::Ignored), Some(Message::SelectAll));
        assert_eq!(map(ctrl_a, event::Status::Captured), None);

        let plain_a = press(Key::Character("a".into()), keyboard::Modifiers::empty());
        assert_eq!(map(plain_a, event::Status::Ignored), None);
    }

    #[test]
    fn test_escape_always_maps() {
        for status in [event::Status::Ignored, event::Status::Captured] {
            let escape = press(Key::Named(key::Named::Escape), keyboard::Modifiers::empty());
            assert_eq!(map(escape, status), Some(Message::Escape));
        }
    }

    #[test]
    fn test_arrows_step_preview_when_free() {
        let left = press(Key::Named(key::Named::ArrowLeft), keyboard::Modifiers::empty());
        assert_eq!(map(left.clone(), event::Status::Ignored), Some(Message::PreviewStep(-1)));
        assert_eq!(map(left, event::Status::Captured), None);
    }

    #[test]
    fn test_modifier_conversion() {
        let changed = |modifiers| map(Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)), event::Status::Ignored);

        assert_eq!(
            changed(keyboard::Modifiers::COMMAND),
            Some(Message::ModifiersChanged(Modifiers::CTRL))
        );
        assert_eq!(
            changed(keyboard::Modifiers::CTRL | keyboard::Modifiers::SHIFT),
            Some(Message::ModifiersChanged(Modifiers { ctrl: true, shift: true }))
        );
        assert_eq!(
            changed(keyboard::Modifiers::SHIFT),
            Some(Message::ModifiersChanged(Modifiers::SHIFT))
        );
        assert_eq!(changed(keyboard::Modifiers::empty()), Some(Message::ModifiersChanged(Modifiers::NONE)));
    }
}
