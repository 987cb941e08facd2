use anyhow::Result;
use ratatui::crossterm::event::{
    self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::widgets::TableState;
use ratatui::{DefaultTerminal, Frame};
use ratatui_image::protocol::StatefulProtocol;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::clipboard::ClipboardBackend;
use crate::controller::{Controller, Event, Phase, Preview};
use crate::exit::ExitStatus;
use crate::history::HistoryTool;
use crate::image::ImageProtocol;
use crate::locale::Vocabulary;
use crate::logging::FlashMessage;
use crate::ui;
use crate::ui::Theme;

/// How long one event poll blocks before the loop re-checks signals
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Display options taken from config and command line
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub show_numbers: bool,
    pub flash_message_duration_ms: u64,
}

impl Default for AppOptions {
    fn default() -> Self {
        AppOptions {
            show_numbers: true,
            flash_message_duration_ms: 3000,
        }
    }
}

/// Terminal front end: turns key presses into controller events and draws the session
pub struct App<H, C> {
    controller: Controller<H, C>,

    vocabulary: Vocabulary,

    theme: Theme,

    options: AppOptions,

    /// Search input with cursor support, mirrored into the controller's query
    search_input: Input,

    /// Highlighted row among the visible entries
    highlighted: usize,

    /// Scroll state of the entry table (kept across frames)
    list_state: TableState,

    /// List area height in terminal rows (updated each frame)
    list_height: u16,

    /// Where the rows were drawn last frame, for mouse hit testing
    list_area: Rect,

    /// Terminal graphics support; None renders images as unavailable
    image_protocol: Option<ImageProtocol>,

    /// Protocol state for the image currently shown, keyed by entry id
    image_state: Option<(String, StatefulProtocol)>,

    /// Flash messages to display (errors, warnings, etc.)
    pub flash_messages: Vec<FlashMessage>,

    /// Receiver for flash messages from logger
    flash_rx: Option<Receiver<FlashMessage>>,
}

impl<H: HistoryTool, C: ClipboardBackend> App<H, C> {
    pub fn new(
        controller: Controller<H, C>,
        vocabulary: Vocabulary,
        theme: Theme,
        image_protocol: Option<ImageProtocol>,
        flash_rx: Option<Receiver<FlashMessage>>,
        options: AppOptions,
    ) -> Self {
        let search_input = Input::new(controller.session().query.clone());
        let mut app = App {
            controller,
            vocabulary,
            theme,
            options,
            search_input,
            highlighted: 0,
            list_state: TableState::default(),
            list_height: 0,
            list_area: Rect::default(),
            image_protocol,
            image_state: None,
            flash_messages: Vec::new(),
            flash_rx,
        };

        app.sync_highlight();
        app
    }

    pub fn controller(&self) -> &Controller<H, C> {
        &self.controller
    }

    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.controller.exit_status()
    }

    /// End the session because signal `signum` was delivered
    pub fn terminate_by_signal(&mut self, signum: i32) {
        log::info!("Received signal {}, terminating", signum);
        self.controller.terminate(ExitStatus::Signal(signum));
    }

    /// Poll flash message receiver and add to queue
    pub fn poll_flash_messages(&mut self) {
        if let Some(rx) = &self.flash_rx {
            while let Ok(msg) = rx.try_recv() {
                self.flash_messages.push(msg);
            }
        }
    }

    /// Remove expired flash messages (based on config duration)
    pub fn prune_flash_messages(&mut self) {
        if self.flash_messages.is_empty() {
            return;
        }

        let now = Instant::now();
        let duration_ms = self.options.flash_message_duration_ms;
        self.flash_messages
            .retain(|msg| now.duration_since(msg.timestamp).as_millis() < duration_ms as u128);
    }

    /// Id of the highlighted visible entry
    pub fn highlighted_id(&self) -> Option<String> {
        self.controller
            .session()
            .visible()
            .get(self.highlighted)
            .map(|e| e.id.clone())
    }

    /// Forward an event, reporting failures through the log (and so the flash area)
    fn dispatch(&mut self, event: Event) {
        if let Err(e) = self.controller.handle(event) {
            log::error!("{:#}", e);
        }

        // Delete and cancel may reset the query behind our back
        let query = &self.controller.session().query;
        if self.search_input.value() != query.as_str() {
            self.search_input = Input::new(query.clone());
            self.highlighted = 0;
        }

        self.sync_highlight();
    }

    /// Clamp the highlight to the visible list and make it the selection
    fn sync_highlight(&mut self) {
        let session = self.controller.session();
        if session.phase != Phase::Listing {
            return;
        }

        let visible = session.visible();
        if visible.is_empty() {
            self.highlighted = 0;
            return;
        }
        self.highlighted = self.highlighted.min(visible.len() - 1);

        let id = &visible[self.highlighted].id;
        if session.selected.as_deref() != Some(id.as_str()) || session.preview.is_none() {
            let event = Event::EntryActivated(id.clone());
            if let Err(e) = self.controller.handle(event) {
                log::error!("{:#}", e);
            }
        }
    }

    fn move_highlight(&mut self, target: usize) {
        self.highlighted = target;
        self.sync_highlight();
    }

    fn page_size(&self) -> usize {
        (self.list_height as usize).max(1)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.controller.terminate(ExitStatus::Cancelled);
            return;
        }

        match self.controller.session().phase {
            Phase::Terminated(_) => {}
            Phase::ConfirmingWipe => self.handle_confirm_key(key),
            Phase::Listing => self.handle_listing_key(key),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.dispatch(Event::WipeConfirmed)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.dispatch(Event::CancelRequested)
            }
            _ => {}
        }
    }

    fn handle_listing_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let last = self.controller.session().visible().len().saturating_sub(1);

        match key.code {
            KeyCode::Esc => self.dispatch(Event::CancelRequested),
            KeyCode::Enter => self.dispatch(Event::CopyRequested),
            KeyCode::Up => self.move_highlight(self.highlighted.saturating_sub(1)),
            KeyCode::Down => self.move_highlight((self.highlighted + 1).min(last)),
            KeyCode::PageUp => {
                self.move_highlight(self.highlighted.saturating_sub(self.page_size()))
            }
            KeyCode::PageDown => {
                self.move_highlight((self.highlighted + self.page_size()).min(last))
            }
            KeyCode::Home => self.move_highlight(0),
            KeyCode::End => self.move_highlight(last),
            KeyCode::Delete => self.request_delete(),
            KeyCode::Char('d') if ctrl => self.request_delete(),
            KeyCode::Char('x') if ctrl => self.dispatch(Event::WipeRequested),
            _ => {
                let changed = self.search_input.handle_event(&TermEvent::Key(key));
                if changed.is_some_and(|c| c.value) {
                    self.highlighted = 0;
                    self.dispatch(Event::FilterChanged(self.search_input.value().to_string()));
                }
            }
        }
    }

    /// Pointer input: hover highlights, click copies, the row marker deletes, wheel scrolls
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.controller.session().phase != Phase::Listing {
            return;
        }

        let last = self.controller.session().visible().len().saturating_sub(1);
        match mouse.kind {
            MouseEventKind::Moved => {
                if let Some(index) = self.row_at(mouse.column, mouse.row)
                    && index != self.highlighted
                {
                    self.move_highlight(index);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(index) = self.row_at(mouse.column, mouse.row) else {
                    return;
                };
                self.move_highlight(index);
                if mouse.column == self.list_area.right().saturating_sub(1) {
                    self.request_delete();
                } else {
                    self.dispatch(Event::CopyRequested);
                }
            }
            MouseEventKind::ScrollUp => self.move_highlight(self.highlighted.saturating_sub(1)),
            MouseEventKind::ScrollDown => self.move_highlight((self.highlighted + 1).min(last)),
            _ => {}
        }
    }

    /// Index into the visible entries of the row under the pointer
    fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.list_area;
        let inside =
            column >= area.x && column < area.right() && row >= area.y && row < area.bottom();
        if !inside {
            return None;
        }

        let index = self.list_state.offset() + (row - area.y) as usize;
        (index < self.controller.session().visible().len()).then_some(index)
    }

    fn request_delete(&mut self) {
        if let Some(id) = self.highlighted_id() {
            self.dispatch(Event::DeleteRequested(id));
        }
    }

    /// Make sure the protocol state matches the selected image
    fn update_image_state(&mut self) {
        let session = self.controller.session();
        let (Some(Preview::Image(img)), Some(id)) = (&session.preview, &session.selected) else {
            self.image_state = None;
            return;
        };
        let Some(protocol) = self.image_protocol.as_mut() else {
            return;
        };

        let stale = self
            .image_state
            .as_ref()
            .is_none_or(|(cached, _)| cached != id);
        if stale {
            self.image_state = Some((id.clone(), protocol.prepare(img.clone())));
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        self.update_image_state();

        let size = frame.area();

        // Set themed background for entire frame
        frame.render_widget(
            ratatui::widgets::Block::default()
                .style(ratatui::prelude::Style::default().bg(self.theme.default_bg)),
            size,
        );

        let layout = ui::create_main_layout(size);

        // Header and spacing take two rows
        self.list_height = layout.clip_list.height.saturating_sub(2);

        let session = self.controller.session();
        let visible = session.visible();
        self.list_state.select(if visible.is_empty() {
            None
        } else {
            Some(self.highlighted)
        });

        self.list_area = ui::render_clip_list(
            frame,
            layout.clip_list,
            &visible,
            &mut self.list_state,
            ui::clip_list::ClipListRenderContext {
                search_input: &self.search_input,
                show_numbers: self.options.show_numbers,
                total: session.entries.len(),
                vocabulary: &self.vocabulary,
                theme: &self.theme,
            },
        );

        ui::render_divider(frame, layout.divider, &self.theme);

        let image = match (&session.selected, self.image_state.as_mut()) {
            (Some(id), Some((cached, state))) if *cached == *id => Some(state),
            _ => None,
        };

        ui::render_preview(
            frame,
            layout.preview,
            session.preview.as_ref(),
            image,
            &self.flash_messages,
            &self.vocabulary,
            &self.theme,
        );

        ui::render_keyboard_hints(
            frame,
            layout.keyboard_hints,
            session.phase,
            &self.vocabulary,
            &self.theme,
        );

        if session.phase == Phase::ConfirmingWipe {
            ui::render_confirm_overlay(frame, size, &self.vocabulary, &self.theme);
        }
    }

    /// Event loop: runs until the session terminates
    /// `signal` holds the number of the last delivered signal, 0 for none
    pub fn run(&mut self, terminal: &mut DefaultTerminal, signal: &AtomicUsize) -> Result<ExitStatus> {
        loop {
            let signum = signal.swap(0, Ordering::SeqCst);
            if signum != 0 {
                self.terminate_by_signal(signum as i32);
            }

            if let Some(status) = self.exit_status() {
                return Ok(status);
            }

            self.poll_flash_messages();
            self.prune_flash_messages();

            terminal.draw(|frame| self.draw(frame))?;

            match event::poll(POLL_INTERVAL) {
                Ok(true) => match event::read()? {
                    TermEvent::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    TermEvent::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                },
                Ok(false) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}
