use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use ratatui_image::StatefulImage;
use ratatui_image::protocol::StatefulProtocol;

use super::{Theme, printable};
use crate::controller::Preview;
use crate::locale::Vocabulary;
use crate::logging::FlashMessage;

/// Render preview panel with content at top and flash messages at bottom
pub fn render_preview(
    frame: &mut Frame,
    area: Rect,
    preview: Option<&Preview>,
    image: Option<&mut StatefulProtocol>,
    flash_messages: &[FlashMessage],
    vocabulary: &Vocabulary,
    theme: &Theme,
) {
    let (content_area, flash_area) = if flash_messages.is_empty() {
        (area, None)
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(flash_messages.len().min(5) as u16),
            ])
            .split(area);
        (chunks[0], Some(chunks[1]))
    };

    let placeholder = |key: &str| {
        Paragraph::new(Span::styled(
            vocabulary.get(key).to_string(),
            theme.preview_placeholder,
        ))
    };

    match preview {
        None => frame.render_widget(placeholder("no-selection"), content_area),
        Some(Preview::Unavailable) => {
            frame.render_widget(placeholder("preview-unavailable"), content_area)
        }
        Some(Preview::Image(_)) => match image {
            Some(state) => {
                frame.render_stateful_widget(StatefulImage::new(None), content_area, state)
            }
            None => frame.render_widget(placeholder("preview-unavailable"), content_area),
        },
        Some(Preview::Text { text, truncated }) => {
            let mut lines: Vec<Line> = text.lines().map(|l| Line::from(printable(l))).collect();
            if *truncated {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("[{}]", vocabulary.get("preview-truncated")),
                    theme.preview_placeholder,
                )));
            }
            let paragraph = Paragraph::new(lines)
                .style(theme.preview_text)
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, content_area);
        }
    }

    if let Some(flash_area) = flash_area {
        // Newest last, keep the most recent ones that fit
        let skip = flash_messages.len().saturating_sub(flash_area.height as usize);
        let lines: Vec<Line> = flash_messages
            .iter()
            .skip(skip)
            .map(|msg| Line::from(Span::styled(printable(&msg.message), theme.flash_style(msg.level))))
            .collect();
        frame.render_widget(Paragraph::new(lines), flash_area);
    }
}
