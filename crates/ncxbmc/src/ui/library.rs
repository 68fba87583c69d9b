//! Library tab: browse media sources and queue files or whole directories.

use ratatui::style::{Modifier, Style};
use xbmc_types::{Entry, MediaKind};

use crate::backend::{BackendResult, MediaBackend};

use super::history::{HistoryFrame, HistoryStack};
use super::keys::Command;
use super::list::ScrollableList;
use super::surface::Pane;
use super::view::{Regions, View, draw_title_bar};

const HELP: &[(Command, &str)] = &[
    (Command::Up, "select previous entry"),
    (Command::Down, "select next entry"),
    (Command::Enter, "open directory"),
    (Command::Back, "back to previous directory"),
    (Command::Add, "add selected file or directory to the playlist"),
    (Command::Clear, "stop and clear the playlist"),
];

#[derive(Debug)]
pub(crate) struct LibraryView {
    list: ScrollableList,
    entries: Vec<Entry>,
    /// `None` lists the media sources.
    location: Option<String>,
    depth: usize,
    last_rendered_depth: Option<usize>,
    history: HistoryStack,
    media: MediaKind,
}

impl LibraryView {
    pub(crate) fn new(media: MediaKind) -> Self {
        Self {
            list: ScrollableList::default(),
            entries: Vec::new(),
            location: None,
            depth: 0,
            last_rendered_depth: None,
            history: HistoryStack::default(),
            media,
        }
    }

    fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.list.selected())
    }

    fn enter_selected(&mut self) -> Regions {
        let Some(entry) = self.selected_entry().filter(|e| e.is_dir()) else {
            return Regions::NONE;
        };
        let frame = HistoryFrame {
            location: self.location.clone(),
            selected: self.list.selected(),
            scroll: self.list.scroll(),
            name: entry.name.clone(),
        };
        let target = entry.path.clone();
        tracing::debug!(location = %target, "enter directory");
        self.history.push(frame);
        self.location = Some(target);
        self.list.restore(0, 0);
        self.depth += 1;
        Regions::MAIN | Regions::FOOTER
    }

    fn go_back(&mut self) -> Regions {
        let Ok(frame) = self.history.pop() else {
            return Regions::NONE;
        };
        self.location = frame.location;
        self.list.restore(frame.selected, frame.scroll);
        self.list.anchor();
        self.depth -= 1;
        Regions::MAIN | Regions::FOOTER
    }

    fn breadcrumb(&self) -> String {
        if self.history.is_empty() {
            return String::new();
        }
        let mut names: Vec<&str> = self.history.breadcrumb_names().collect();
        names.reverse();
        names.iter().map(|name| format!(" > {name}")).collect()
    }
}

impl View for LibraryView {
    fn title(&self) -> &'static str {
        "Library"
    }

    fn help(&self) -> &'static [(Command, &'static str)] {
        HELP
    }

    fn draw_header(&mut self, pane: &mut Pane, _backend: &dyn MediaBackend) -> BackendResult<()> {
        draw_title_bar(pane, self.title());
        let media = match self.media {
            MediaKind::Music => "Music",
            MediaKind::Video => "Video",
        };
        pane.put_str_right(0, media, Style::default());
        Ok(())
    }

    fn draw_main(&mut self, pane: &mut Pane, backend: &dyn MediaBackend) -> BackendResult<()> {
        debug_assert_eq!(self.history.len(), self.depth);
        if self.last_rendered_depth != Some(self.depth) {
            self.entries = backend.list_directory(self.media, self.location.as_deref())?;
            self.last_rendered_depth = Some(self.depth);
            self.list.clamp_to(self.entries.len());
        }
        self.list.set_viewport(usize::from(pane.height()));
        self.list.reconcile_scroll();

        let selected = self.list.selected();
        for (row, (index, entry)) in self.list.visible_slice(&self.entries).into_iter().enumerate() {
            let Ok(row) = u16::try_from(row) else {
                break;
            };
            let mut style = Style::default();
            if index == selected {
                style = style.add_modifier(Modifier::REVERSED);
                pane.style_row(row, style);
            }
            if entry.is_dir() {
                pane.put_str(row, 0, &format!("{}/", entry.name), style.add_modifier(Modifier::BOLD));
            } else {
                pane.put_str(row, 0, &entry.name, style);
            }
        }
        Ok(())
    }

    fn draw_footer(&mut self, pane: &mut Pane, _backend: &dyn MediaBackend) -> BackendResult<()> {
        pane.hline(0);
        pane.put_str(1, 0, &self.breadcrumb(), Style::default());
        pane.put_str_right(1, &format!("{} items", self.entries.len()), Style::default());
        Ok(())
    }

    fn handle_key(&mut self, command: Command, backend: &dyn MediaBackend) -> BackendResult<Regions> {
        match command {
            Command::Up => {
                self.list.move_selection(-1, self.entries.len());
                Ok(Regions::MAIN)
            }
            Command::Down => {
                self.list.move_selection(1, self.entries.len());
                Ok(Regions::MAIN)
            }
            Command::Enter => Ok(self.enter_selected()),
            Command::Back => Ok(self.go_back()),
            Command::Add => {
                let Some(entry) = self.selected_entry() else {
                    return Ok(Regions::NONE);
                };
                let playlist = self.media.playlist();
                backend.add_to_playlist(entry, playlist)?;
                backend.set_active_playlist(playlist)?;
                tracing::info!(path = %entry.path, "added to playlist");
                Ok(Regions::NONE)
            }
            Command::Clear => {
                backend.stop()?;
                backend.clear_playlist(self.media.playlist())?;
                Ok(Regions::NONE)
            }
            _ => Ok(Regions::NONE),
        }
    }

    fn tick(&mut self, _backend: &dyn MediaBackend) -> BackendResult<Regions> {
        Ok(Regions::NONE)
    }
}

#[cfg(test)]
mod tests {
    use xbmc_types::{PlaylistKind, TrackTags};

    use super::*;
    use crate::ui::testing::FakeBackend;

    fn library() -> FakeBackend {
        FakeBackend::default()
            .with_dir(
                None,
                vec![
                    Entry::directory("/music/Blues/", "Blues"),
                    Entry::directory("/music/Classical/", "Classical"),
                    Entry::directory("/music/Jazz/", "Jazz"),
                    Entry::directory("/music/Rock/", "Rock"),
                ],
            )
            .with_dir(
                Some("/music/Jazz/"),
                vec![
                    Entry::directory("/music/Jazz/Miles/", "Miles"),
                    Entry::track("/music/Jazz/so_what.flac", "so_what.flac", TrackTags::default()),
                ],
            )
    }

    fn drawn(view: &mut LibraryView, backend: &FakeBackend) -> Pane {
        let mut pane = Pane::new(30, 3);
        view.draw_main(&mut pane, backend).unwrap();
        pane
    }

    #[test]
    fn enter_then_back_restores_position() {
        let backend = library();
        let mut view = LibraryView::new(MediaKind::Music);
        drawn(&mut view, &backend);
        view.handle_key(Command::Down, &backend).unwrap();
        view.handle_key(Command::Down, &backend).unwrap();
        let before = (view.list.selected(), view.list.scroll());
        assert_eq!(before.0, 2);

        let regions = view.handle_key(Command::Enter, &backend).unwrap();
        assert_eq!(regions, Regions::MAIN | Regions::FOOTER);
        assert_eq!(view.depth, 1);
        assert_eq!(view.history.len(), view.depth);
        assert_eq!(view.location.as_deref(), Some("/music/Jazz/"));
        let pane = drawn(&mut view, &backend);
        assert_eq!(pane.row_text(0), "Miles/");
        assert_eq!(pane.row_text(1), "so_what.flac");

        view.handle_key(Command::Back, &backend).unwrap();
        assert_eq!(view.depth, 0);
        assert!(view.history.is_empty());
        assert_eq!(view.location, None);
        assert_eq!((view.list.selected(), view.list.scroll()), before);
        let pane = drawn(&mut view, &backend);
        assert_eq!(pane.row_text(0), "Blues/");
        assert_eq!(backend.count("list_directory"), 3);
    }

    #[test]
    fn deep_round_trip_restores_each_level() {
        let dirs = |parent: &str, n: usize| -> Vec<Entry> {
            (0..n)
                .map(|i| Entry::directory(format!("{parent}d{i}/"), format!("d{i}")))
                .collect()
        };
        let backend = FakeBackend::default()
            .with_dir(None, dirs("/", 6))
            .with_dir(Some("/d4/"), dirs("/d4/", 7))
            .with_dir(Some("/d4/d5/"), dirs("/d4/d5/", 2));
        let mut view = LibraryView::new(MediaKind::Music);
        drawn(&mut view, &backend);

        let mut saved = Vec::new();
        for steps in [4, 5] {
            for _ in 0..steps {
                view.handle_key(Command::Down, &backend).unwrap();
                drawn(&mut view, &backend);
            }
            saved.push((view.list.selected(), view.list.scroll()));
            view.handle_key(Command::Enter, &backend).unwrap();
            drawn(&mut view, &backend);
            assert_eq!(view.history.len(), view.depth);
        }
        assert_eq!(saved, vec![(4, 2), (5, 3)]);
        assert_eq!(view.depth, 2);
        assert_eq!(view.location.as_deref(), Some("/d4/d5/"));

        while let Some(expected) = saved.pop() {
            view.handle_key(Command::Back, &backend).unwrap();
            assert_eq!((view.list.selected(), view.list.scroll()), expected);
            assert_eq!(view.history.len(), view.depth);
            assert_eq!(view.depth, saved.len());
            let pane = drawn(&mut view, &backend);
            assert!(pane.cell_style(0, 2).add_modifier.contains(Modifier::REVERSED));
        }
        assert_eq!(view.location, None);
    }

    #[test]
    fn back_into_shorter_window_keeps_selection_visible() {
        let backend = FakeBackend::default()
            .with_dir(
                None,
                (0..10)
                    .map(|i| Entry::directory(format!("/d{i}/"), format!("d{i}")))
                    .collect(),
            )
            .with_dir(Some("/d8/"), Vec::new());
        let mut view = LibraryView::new(MediaKind::Music);
        let mut tall = Pane::new(30, 9);
        view.draw_main(&mut tall, &backend).unwrap();
        view.list.move_selection(8, 10);
        view.draw_main(&mut tall, &backend).unwrap();
        view.handle_key(Command::Enter, &backend).unwrap();
        view.draw_main(&mut tall, &backend).unwrap();

        view.list.set_viewport(3);
        view.handle_key(Command::Back, &backend).unwrap();
        assert_eq!((view.list.selected(), view.list.scroll()), (8, 6));
        let pane = drawn(&mut view, &backend);
        assert_eq!(pane.row_text(2), "d8/");
    }

    #[test]
    fn back_at_root_is_a_no_op() {
        let backend = library();
        let mut view = LibraryView::new(MediaKind::Music);
        drawn(&mut view, &backend);
        assert_eq!(view.handle_key(Command::Back, &backend).unwrap(), Regions::NONE);
        assert_eq!(view.depth, 0);
    }

    #[test]
    fn enter_on_track_does_nothing() {
        let backend = library();
        let mut view = LibraryView::new(MediaKind::Music);
        drawn(&mut view, &backend);
        view.list.move_selection(2, 4);
        view.handle_key(Command::Enter, &backend).unwrap();
        drawn(&mut view, &backend);
        view.list.move_selection(1, 2);
        assert_eq!(view.handle_key(Command::Enter, &backend).unwrap(), Regions::NONE);
        assert_eq!(view.depth, 1);
    }

    #[test]
    fn listing_is_fetched_once_per_depth() {
        let backend = library();
        let mut view = LibraryView::new(MediaKind::Music);
        drawn(&mut view, &backend);
        view.handle_key(Command::Down, &backend).unwrap();
        drawn(&mut view, &backend);
        drawn(&mut view, &backend);
        assert_eq!(backend.count("list_directory"), 1);
    }

    #[test]
    fn add_queues_on_music_playlist() {
        let backend = library();
        let mut view = LibraryView::new(MediaKind::Music);
        drawn(&mut view, &backend);
        let regions = view.handle_key(Command::Add, &backend).unwrap();
        assert_eq!(regions, Regions::NONE);
        let state = backend.state.borrow();
        assert_eq!(state.added, vec![("/music/Blues/".to_string(), PlaylistKind::Music)]);
        assert_eq!(state.active_playlist, PlaylistKind::Music);
        assert_eq!(view.list.selected(), 0);
    }

    #[test]
    fn clear_stops_playback() {
        let backend = library();
        let mut view = LibraryView::new(MediaKind::Music);
        view.handle_key(Command::Clear, &backend).unwrap();
        assert_eq!(
            backend.calls(),
            vec!["stop".to_string(), "clear_playlist(Music)".to_string()]
        );
    }

    #[test]
    fn footer_shows_breadcrumb_and_count() {
        let backend = library().with_dir(Some("/music/Jazz/Miles/"), Vec::new());
        let mut view = LibraryView::new(MediaKind::Music);
        drawn(&mut view, &backend);
        view.list.move_selection(2, 4);
        view.handle_key(Command::Enter, &backend).unwrap();
        drawn(&mut view, &backend);
        view.handle_key(Command::Enter, &backend).unwrap();
        drawn(&mut view, &backend);

        let mut footer = Pane::new(40, 2);
        view.draw_footer(&mut footer, &backend).unwrap();
        assert_eq!(footer.row_text(1), " > Jazz > Miles                  0 items");
        assert_eq!(view.tick(&backend).unwrap(), Regions::NONE);
    }
}
