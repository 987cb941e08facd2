use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::Theme;
use crate::controller::Phase;
use crate::locale::Vocabulary;

/// (keys, vocabulary key of the description)
type Hints = &'static [(&'static [&'static str], &'static str)];

const LISTING_HINTS: Hints = &[
    (&["↑", "↓"], "move"),
    (&["Enter"], "copy"),
    (&["Del"], "delete"),
    (&["Ctrl-X"], "clear"),
    (&["Esc"], "close"),
];

const CONFIRM_HINTS: Hints = &[(&["y"], "yes"), (&["n", "Esc"], "no")];

/// Render the hints bar: window title, then phase-specific shortcuts
pub fn render_keyboard_hints(
    frame: &mut Frame,
    area: Rect,
    phase: Phase,
    vocabulary: &Vocabulary,
    theme: &Theme,
) {
    let hint_data = match phase {
        Phase::Listing => LISTING_HINTS,
        Phase::ConfirmingWipe => CONFIRM_HINTS,
        Phase::Terminated(_) => &[],
    };

    let mut hints = vec![
        Span::styled(
            vocabulary.get("clipboard-history").to_string(),
            theme.status_key.add_modifier(Modifier::ITALIC),
        ),
        Span::raw("   "),
    ];

    for (keys, description) in hint_data {
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                hints.push(Span::styled("/", theme.status_desc.add_modifier(Modifier::DIM)));
            }
            hints.push(Span::styled(*key, theme.status_key));
        }

        hints.push(Span::raw(" "));
        hints.push(Span::styled(vocabulary.get(description).to_string(), theme.status_desc));
        hints.push(Span::raw("  "));
    }

    let paragraph =
        Paragraph::new(Line::from(hints)).style(theme.status_desc.bg(theme.status_bar_bg));

    frame.render_widget(paragraph, area);
}
