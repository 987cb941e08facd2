//! Clip history controller
//!
//! Toolkit-independent session logic. The terminal layer translates its
//! native input into [`Event`]s and renders from [`Session`]; everything that
//! touches the history goes through the [`HistoryTool`] seam.

pub mod preview;

use anyhow::{Context, Result, bail};
use lru::LruCache;
use std::num::NonZeroUsize;

use crate::clipboard::ClipboardBackend;
use crate::exit::ExitStatus;
use crate::history::HistoryTool;
use crate::models::{HistoryEntry, Listing, filter};

pub use preview::{Preview, PreviewLimits};

/// User intent, independent of any UI toolkit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Search text changed to the given value
    FilterChanged(String),
    /// Entry with this id became the selection
    EntryActivated(String),
    /// Delete the entry with this id
    DeleteRequested(String),
    /// Copy the selected entry and finish
    CopyRequested,
    /// Ask for confirmation to wipe the history
    WipeRequested,
    /// Confirmation given
    WipeConfirmed,
    /// Escape-like input
    CancelRequested,
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Listing,
    ConfirmingWipe,
    Terminated(ExitStatus),
}

/// All mutable UI state of one interactive session
#[derive(Debug, Clone)]
pub struct Session {
    /// Last fetched listing, in the tool's order
    pub entries: Vec<HistoryEntry>,
    /// Current search text
    pub query: String,
    /// Id of the selected entry
    pub selected: Option<String>,
    /// Decoded preview of the selected entry
    pub preview: Option<Preview>,
    pub phase: Phase,
}

impl Session {
    fn new() -> Self {
        Session {
            entries: Vec::new(),
            query: String::new(),
            selected: None,
            preview: None,
            phase: Phase::Listing,
        }
    }

    /// Entries matching the current query
    pub fn visible(&self) -> Vec<&HistoryEntry> {
        filter(&self.entries, &self.query)
    }

    /// Currently selected entry, if it is still in the listing
    pub fn selected_entry(&self) -> Option<&HistoryEntry> {
        let id = self.selected.as_deref()?;
        self.entries.iter().find(|e| e.id == id)
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.preview = None;
    }
}

/// Drives one session against a history tool and a clipboard
pub struct Controller<H, C> {
    history: H,
    clipboard: C,
    session: Session,
    preview_cache: LruCache<String, Preview>,
    limits: PreviewLimits,
}

impl<H: HistoryTool, C: ClipboardBackend> Controller<H, C> {
    /// Create a controller and perform the initial fetch
    pub fn new(history: H, clipboard: C, limits: PreviewLimits, cache_size: usize) -> Self {
        let cache_size = NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN);
        let mut controller = Controller {
            history,
            clipboard,
            session: Session::new(),
            preview_cache: LruCache::new(cache_size),
            limits,
        };
        controller.refresh();
        controller
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Exit status once the session has terminated
    pub fn exit_status(&self) -> Option<ExitStatus> {
        match self.session.phase {
            Phase::Terminated(status) => Some(status),
            _ => None,
        }
    }

    /// Query the history tool and parse its listing
    /// Malformed lines are logged and skipped; a failed invocation yields no entries
    pub fn fetch(&self) -> Vec<HistoryEntry> {
        let output = match self.history.list() {
            Ok(output) => output,
            Err(e) => {
                log::error!("Failed to list clipboard history: {}", e);
                return Vec::new();
            }
        };

        let listing = Listing::parse(&output);
        for err in &listing.errors {
            log::warn!("Skipping history line: {}", err);
        }
        log::debug!(
            "Fetched {} entries from {} ({} skipped)",
            listing.entries.len(),
            self.history.name(),
            listing.errors.len()
        );

        listing.entries
    }

    /// Rebuild the listing from scratch
    fn refresh(&mut self) {
        self.session.entries = self.fetch();
        self.preview_cache.clear();

        if self.session.selected.is_some() && self.session.selected_entry().is_none() {
            self.session.clear_selection();
        }
    }

    /// Apply one event
    /// Errors leave the session in a consistent, non-terminated state
    pub fn handle(&mut self, event: Event) -> Result<()> {
        match self.session.phase {
            Phase::Terminated(_) => {
                log::debug!("Ignoring {:?} after termination", event);
                Ok(())
            }
            Phase::ConfirmingWipe => match event {
                Event::WipeConfirmed => self.wipe(),
                Event::CancelRequested => {
                    self.session.phase = Phase::Listing;
                    Ok(())
                }
                other => {
                    log::debug!("Ignoring {:?} while confirming wipe", other);
                    Ok(())
                }
            },
            Phase::Listing => match event {
                Event::FilterChanged(query) => {
                    self.set_filter(query);
                    Ok(())
                }
                Event::EntryActivated(id) => {
                    self.select(&id);
                    Ok(())
                }
                Event::DeleteRequested(id) => self.delete(&id),
                Event::CopyRequested => self.copy_selected(),
                Event::WipeRequested => {
                    self.session.phase = Phase::ConfirmingWipe;
                    Ok(())
                }
                Event::WipeConfirmed => {
                    log::debug!("Wipe confirmation without a pending request, ignoring");
                    Ok(())
                }
                Event::CancelRequested => {
                    self.cancel();
                    Ok(())
                }
            },
        }
    }

    /// End the session with the given status (signals, Ctrl-C)
    pub fn terminate(&mut self, status: ExitStatus) {
        self.session.phase = Phase::Terminated(status);
    }

    fn set_filter(&mut self, query: String) {
        self.session.query = query;

        let still_visible = self
            .session
            .selected
            .as_deref()
            .is_some_and(|id| self.session.visible().iter().any(|e| e.id == id));
        if !still_visible {
            self.session.clear_selection();
        }
    }

    fn select(&mut self, id: &str) {
        let Some(raw) = self.session.entries.iter().find(|e| e.id == id).map(|e| e.raw.clone())
        else {
            log::debug!("Select of unknown entry {}", id);
            return;
        };
        if self.session.selected.as_deref() == Some(id) && self.session.preview.is_some() {
            return;
        }

        let preview = match self.preview_cache.get(id) {
            Some(cached) => cached.clone(),
            None => {
                let preview = match self.history.decode(&raw) {
                    Ok(data) => Preview::from_payload(&data, self.limits),
                    Err(e) => {
                        log::warn!("Failed to decode entry {} for preview: {}", id, e);
                        Preview::Unavailable
                    }
                };
                self.preview_cache.put(id.to_string(), preview.clone());
                preview
            }
        };

        self.session.selected = Some(id.to_string());
        self.session.preview = Some(preview);
    }

    fn copy_selected(&mut self) -> Result<()> {
        let Some((id, raw)) = self
            .session
            .selected_entry()
            .map(|e| (e.id.clone(), e.raw.clone()))
        else {
            log::debug!("Copy requested with no selection");
            return Ok(());
        };

        let data = self
            .history
            .decode(&raw)
            .with_context(|| format!("Failed to decode entry {}", id))?;
        if data.is_empty() {
            bail!("Entry {} decoded to nothing, clipboard left unchanged", id);
        }

        self.clipboard
            .write(&data)
            .with_context(|| format!("Failed to copy entry {} via {}", id, self.clipboard.name()))?;

        log::info!("Copied entry {} ({} bytes)", id, data.len());
        self.session.phase = Phase::Terminated(ExitStatus::Copied);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let Some(entry) = self.session.entries.iter().find(|e| e.id == id) else {
            log::debug!("Delete of unknown entry {}", id);
            return Ok(());
        };
        let raw = entry.raw.clone();

        self.history
            .delete(&raw)
            .with_context(|| format!("Failed to delete entry {}", id))?;
        log::info!("Deleted entry {}", id);

        self.session.clear_selection();
        self.session.query.clear();
        self.refresh();
        Ok(())
    }

    fn wipe(&mut self) -> Result<()> {
        match self.history.wipe() {
            Ok(()) => {
                log::info!("Wiped clipboard history");
                self.session.phase = Phase::Terminated(ExitStatus::Wiped);
                Ok(())
            }
            Err(e) => {
                self.session.phase = Phase::Listing;
                Err(e).context("Failed to wipe clipboard history")
            }
        }
    }

    fn cancel(&mut self) {
        if self.session.query.is_empty() {
            self.session.phase = Phase::Terminated(ExitStatus::Cancelled);
        } else {
            self.set_filter(String::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::RecordingClipboard;
    use crate::history::fake::FakeHistory;

    fn controller(lines: &[(&str, &str)]) -> Controller<FakeHistory, RecordingClipboard> {
        Controller::new(
            FakeHistory::with_text(lines),
            RecordingClipboard::default(),
            PreviewLimits::default(),
            8,
        )
    }

    fn ids(c: &Controller<FakeHistory, RecordingClipboard>) -> Vec<String> {
        c.session().visible().iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_initial_fetch_preserves_order() {
        let c = controller(&[("3", "newest"), ("2", "middle"), ("1", "oldest")]);
        assert_eq!(ids(&c), vec!["3", "2", "1"]);
        assert_eq!(c.session().phase, Phase::Listing);
    }

    #[test]
    fn test_fetch_skips_malformed_lines() {
        let mut history = FakeHistory::with_text(&[("1", "hello")]);
        history.listing_suffix = b"broken line\n2\tworld wide\n".to_vec();
        let c = Controller::new(history, RecordingClipboard::default(), PreviewLimits::default(), 4);
        assert_eq!(ids(&c), vec!["1", "2"]);
    }

    #[test]
    fn test_failed_list_is_empty_history() {
        let history = FakeHistory {
            fail_list: true,
            ..FakeHistory::with_text(&[("1", "hello")])
        };
        let c = Controller::new(history, RecordingClipboard::default(), PreviewLimits::default(), 4);
        assert!(c.session().entries.is_empty());
        assert_eq!(c.session().phase, Phase::Listing);
    }

    #[test]
    fn test_filter_event() {
        let mut c = controller(&[("1", "hello"), ("2", "world wide")]);
        c.handle(Event::FilterChanged("wor".into())).unwrap();
        let visible = c.session().visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].raw, b"2\tworld wide");
    }

    #[test]
    fn test_filter_hiding_selection_clears_it() {
        let mut c = controller(&[("1", "hello"), ("2", "world wide")]);
        c.handle(Event::EntryActivated("1".into())).unwrap();
        c.handle(Event::FilterChanged("hel".into())).unwrap();
        assert_eq!(c.session().selected.as_deref(), Some("1"));

        c.handle(Event::FilterChanged("wor".into())).unwrap();
        assert!(c.session().selected.is_none());
        assert!(c.session().preview.is_none());
    }

    #[test]
    fn test_select_decodes_preview() {
        let mut c = controller(&[("1", "hello")]);
        c.handle(Event::EntryActivated("1".into())).unwrap();
        assert_eq!(c.session().selected.as_deref(), Some("1"));
        match &c.session().preview {
            Some(Preview::Text { text, .. }) => assert_eq!(text, "hello"),
            other => panic!("unexpected preview {:?}", other),
        }
    }

    #[test]
    fn test_decode_receives_whole_listing_line() {
        // The fake only answers for the exact line, tabs in the preview included
        let mut c = controller(&[("3", "col1\tcol2")]);
        c.handle(Event::EntryActivated("3".into())).unwrap();
        match &c.session().preview {
            Some(Preview::Text { text, .. }) => assert_eq!(text, "col1\tcol2"),
            other => panic!("unexpected preview {:?}", other),
        }
    }

    #[test]
    fn test_select_image_payload() {
        let mut history = FakeHistory::with_text(&[("5", "[[ binary data 1 KiB png 8x8 ]]")]);
        history.set_payload("5", crate::image::png_bytes(8, 8));
        let mut c = Controller::new(history, RecordingClipboard::default(), PreviewLimits::default(), 4);
        c.handle(Event::EntryActivated("5".into())).unwrap();
        assert!(c.session().preview.as_ref().is_some_and(Preview::is_image));
    }

    #[test]
    fn test_select_empty_payload_is_unavailable() {
        let mut history = FakeHistory::with_text(&[("1", "ghost")]);
        history.set_payload("1", Vec::new());
        let mut c = Controller::new(history, RecordingClipboard::default(), PreviewLimits::default(), 4);
        c.handle(Event::EntryActivated("1".into())).unwrap();
        assert!(matches!(c.session().preview, Some(Preview::Unavailable)));
    }

    #[test]
    fn test_preview_cache_avoids_second_decode() {
        let mut c = controller(&[("1", "a"), ("2", "b")]);
        c.handle(Event::EntryActivated("1".into())).unwrap();
        c.handle(Event::EntryActivated("2".into())).unwrap();
        c.handle(Event::EntryActivated("1".into())).unwrap();
        assert_eq!(*c.history().decode_calls.borrow(), vec!["1", "2"]);
    }

    #[test]
    fn test_select_unknown_id_is_ignored() {
        let mut c = controller(&[("1", "a")]);
        c.handle(Event::EntryActivated("99".into())).unwrap();
        assert!(c.session().selected.is_none());
    }

    #[test]
    fn test_copy_without_selection_is_noop() {
        let mut c = controller(&[("1", "hello")]);
        c.handle(Event::CopyRequested).unwrap();
        assert!(c.clipboard().writes().is_empty());
        assert_eq!(c.session().phase, Phase::Listing);
    }

    #[test]
    fn test_copy_selected_terminates() {
        let mut c = controller(&[("1", "hello"), ("2", "world")]);
        c.handle(Event::EntryActivated("2".into())).unwrap();
        c.handle(Event::CopyRequested).unwrap();
        assert_eq!(c.clipboard().writes(), vec![b"world".to_vec()]);
        assert_eq!(c.exit_status(), Some(ExitStatus::Copied));
    }

    #[test]
    fn test_copy_failure_keeps_listing() {
        let clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        let mut c = Controller::new(
            FakeHistory::with_text(&[("1", "hello")]),
            clipboard,
            PreviewLimits::default(),
            4,
        );
        c.handle(Event::EntryActivated("1".into())).unwrap();
        assert!(c.handle(Event::CopyRequested).is_err());
        assert_eq!(c.session().phase, Phase::Listing);
    }

    #[test]
    fn test_copy_of_empty_payload_is_an_error() {
        let mut history = FakeHistory::with_text(&[("1", "ghost")]);
        history.set_payload("1", Vec::new());
        let mut c = Controller::new(history, RecordingClipboard::default(), PreviewLimits::default(), 4);
        c.handle(Event::EntryActivated("1".into())).unwrap();
        assert!(c.handle(Event::CopyRequested).is_err());
        assert!(c.clipboard().writes().is_empty());
    }

    #[test]
    fn test_delete_sends_raw_line_and_refetches() {
        let mut c = controller(&[("1", "hello"), ("2", "world wide")]);
        c.handle(Event::EntryActivated("1".into())).unwrap();
        c.handle(Event::FilterChanged("hel".into())).unwrap();
        c.handle(Event::DeleteRequested("1".into())).unwrap();

        assert_eq!(c.history().delete_calls, vec![b"1\thello".to_vec()]);
        assert_eq!(ids(&c), vec!["2"]);
        assert!(c.session().selected.is_none());
        assert!(c.session().preview.is_none());
        assert!(c.session().query.is_empty());
    }

    #[test]
    fn test_deleted_line_never_comes_back() {
        let mut c = controller(&[("3", "c"), ("2", "b"), ("1", "a")]);
        for id in ["2", "3"] {
            let raw = c
                .session()
                .entries
                .iter()
                .find(|e| e.id == id)
                .unwrap()
                .raw
                .clone();
            c.handle(Event::DeleteRequested(id.into())).unwrap();
            assert!(c.fetch().iter().all(|e| e.raw != raw));
        }
        assert_eq!(ids(&c), vec!["1"]);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut c = controller(&[("1", "hello")]);
        c.handle(Event::DeleteRequested("42".into())).unwrap();
        assert!(c.history().delete_calls.is_empty());
    }

    #[test]
    fn test_wipe_requires_confirmation() {
        let mut c = controller(&[("1", "hello")]);
        c.handle(Event::WipeConfirmed).unwrap();
        assert_eq!(c.history().wipe_calls, 0);

        c.handle(Event::WipeRequested).unwrap();
        assert_eq!(c.session().phase, Phase::ConfirmingWipe);
        assert_eq!(c.history().wipe_calls, 0);

        c.handle(Event::WipeConfirmed).unwrap();
        assert_eq!(c.history().wipe_calls, 1);
        assert_eq!(c.exit_status(), Some(ExitStatus::Wiped));
    }

    #[test]
    fn test_wipe_cancel_returns_to_listing() {
        let mut c = controller(&[("1", "hello")]);
        c.handle(Event::WipeRequested).unwrap();
        c.handle(Event::CancelRequested).unwrap();
        assert_eq!(c.session().phase, Phase::Listing);
        assert_eq!(c.history().wipe_calls, 0);
    }

    #[test]
    fn test_confirming_wipe_ignores_other_events() {
        let mut c = controller(&[("1", "hello")]);
        c.handle(Event::EntryActivated("1".into())).unwrap();
        c.handle(Event::WipeRequested).unwrap();
        c.handle(Event::CopyRequested).unwrap();
        c.handle(Event::DeleteRequested("1".into())).unwrap();
        assert!(c.clipboard().writes().is_empty());
        assert!(c.history().delete_calls.is_empty());
        assert_eq!(c.session().phase, Phase::ConfirmingWipe);
    }

    #[test]
    fn test_failed_wipe_returns_to_listing() {
        let history = FakeHistory {
            fail_wipe: true,
            ..FakeHistory::with_text(&[("1", "hello")])
        };
        let mut c = Controller::new(history, RecordingClipboard::default(), PreviewLimits::default(), 4);
        c.handle(Event::WipeRequested).unwrap();
        assert!(c.handle(Event::WipeConfirmed).is_err());
        assert_eq!(c.session().phase, Phase::Listing);
    }

    #[test]
    fn test_cancel_clears_filter_first() {
        let mut c = controller(&[("1", "hello")]);
        c.handle(Event::FilterChanged("he".into())).unwrap();
        c.handle(Event::CancelRequested).unwrap();
        assert!(c.session().query.is_empty());
        assert_eq!(c.session().phase, Phase::Listing);

        c.handle(Event::CancelRequested).unwrap();
        assert_eq!(c.exit_status(), Some(ExitStatus::Cancelled));
    }

    #[test]
    fn test_events_after_termination_are_ignored() {
        let mut c = controller(&[("1", "hello")]);
        c.terminate(ExitStatus::Signal(15));
        c.handle(Event::EntryActivated("1".into())).unwrap();
        c.handle(Event::CopyRequested).unwrap();
        assert!(c.clipboard().writes().is_empty());
        assert_eq!(c.exit_status(), Some(ExitStatus::Signal(15)));
    }
}
