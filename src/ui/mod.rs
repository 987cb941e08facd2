pub mod clip_list;
pub mod layout;
pub mod preview;
pub mod status;
pub mod theme;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::locale::Vocabulary;

pub use clip_list::render_clip_list;
pub use layout::{MainLayout, centered_rect, create_main_layout};
pub use preview::render_preview;
pub use status::render_keyboard_hints;
pub use theme::{BuiltInTheme, Theme};

/// Columns a TAB expands to on screen
const TAB_WIDTH: usize = 4;

/// Text safe to put into cells: TABs become spaces, other control characters U+FFFD
///
/// Cell symbols are written to the terminal verbatim, so an ESC from a
/// clipboard entry would otherwise reach the terminal as an escape sequence.
pub fn printable(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => out.extend(std::iter::repeat_n(' ', TAB_WIDTH)),
            c if c.is_control() => out.push(char::REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    out
}

pub fn render_divider(frame: &mut Frame, area: Rect, theme: &Theme) {
    let column = vec![Line::styled(theme.divider.as_str(), theme.divider_style); area.height as usize];
    frame.render_widget(Paragraph::new(column), area);
}

/// Modal asking whether to wipe the whole history
pub fn render_confirm_overlay(frame: &mut Frame, area: Rect, vocabulary: &Vocabulary, theme: &Theme) {
    let popup = centered_rect(60, 40, area);
    frame.render_widget(Clear, popup);

    let answer = |key: &'static str, word: &str| {
        [
            Span::styled(key, theme.confirm_key),
            Span::styled(format!(" {}   ", vocabulary.get(word)), theme.confirm_text),
        ]
    };
    let answers: Vec<Span> = answer("y", "yes").into_iter().chain(answer("n", "no")).collect();

    let body = Text::from(vec![
        Line::styled(vocabulary.get("wipe-warning").to_string(), theme.confirm_warning),
        Line::default(),
        Line::from(answers),
    ]);

    let block = Block::new()
        .borders(Borders::ALL)
        .border_style(theme.divider_style)
        .title(Line::styled(
            format!(" {} ", vocabulary.get("wipe-confirm")),
            theme.confirm_text.add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(theme.confirm_modal_bg));

    frame.render_widget(
        Paragraph::new(body)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup,
    );
}
