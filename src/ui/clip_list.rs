use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::prelude::*;
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use tui_input::Input;
use unicode_width::UnicodeWidthStr;

use super::{Theme, printable};
use crate::locale::Vocabulary;
use crate::models::HistoryEntry;

/// Prompt in front of the search text
const SEARCH_PROMPT: &str = "/ ";

/// Clickable marker in the last column of every row
pub const DELETE_MARKER: &str = "✕";

/// Context for rendering the clip list
pub struct ClipListRenderContext<'a> {
    pub search_input: &'a Input,
    pub show_numbers: bool,
    /// Entries in the full listing, before filtering
    pub total: usize,
    pub vocabulary: &'a Vocabulary,
    pub theme: &'a Theme,
}

/// Width of the id column: widest id, at least 3
fn id_column_width(entries: &[&HistoryEntry]) -> u16 {
    entries
        .iter()
        .map(|e| e.id.width())
        .max()
        .unwrap_or(0)
        .max(3) as u16
}

fn render_rows<'a>(
    entries: &[&HistoryEntry],
    selected: Option<usize>,
    show_numbers: bool,
    preview_width: usize,
    theme: &Theme,
) -> Vec<Row<'a>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_selected = selected == Some(i);

            let preview = printable(&entry.display_preview(preview_width));
            let preview_style = if is_selected {
                theme.clip_text_selected
            } else {
                theme.clip_text
            };

            let mut cells = Vec::with_capacity(3);
            if show_numbers {
                cells.push(Cell::from(Span::styled(entry.id.clone(), theme.clip_number)));
            }
            cells.push(Cell::from(Span::styled(preview, preview_style)));
            cells.push(Cell::from(Span::styled(DELETE_MARKER, theme.status_desc)));

            let row = Row::new(cells);
            if is_selected {
                row.style(Style::default().bg(theme.selection_bg))
            } else {
                row
            }
        })
        .collect()
}

/// Render the search header and the list of visible entries
/// Returns the area the rows occupy, one entry per terminal row
pub fn render_clip_list(
    frame: &mut Frame,
    area: Rect,
    entries: &[&HistoryEntry],
    state: &mut TableState,
    ctx: ClipListRenderContext,
) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Search + count
            Constraint::Length(1), // Spacing
            Constraint::Min(1),    // List
        ])
        .split(area);

    let header_area = chunks[0];
    let list_area = chunks[2];
    let theme = ctx.theme;
    let voc = ctx.vocabulary;

    // Header: search prompt on the left, item count on the right
    let count_text = if entries.len() == ctx.total {
        format!("{} {}", ctx.total, voc.get("items"))
    } else {
        format!("{}/{} {}", entries.len(), ctx.total, voc.get("items"))
    };

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(count_text.width() as u16),
        ])
        .split(header_area);

    let query = ctx.search_input.value();
    let search_line = if query.is_empty() {
        Line::from(vec![
            Span::styled(SEARCH_PROMPT, theme.search_input),
            Span::styled(voc.get("search").to_string(), theme.clip_list_header),
        ])
    } else {
        Line::from(vec![
            Span::styled(SEARCH_PROMPT, theme.search_input),
            Span::styled(query.to_string(), theme.search_input),
        ])
    };
    frame.render_widget(
        Paragraph::new(search_line).style(Style::default().bg(theme.search_focused_bg)),
        header_chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(count_text, theme.clip_list_item_count)),
        header_chunks[2],
    );

    let cursor_x = header_chunks[0].x + SEARCH_PROMPT.width() as u16 + ctx.search_input.visual_cursor() as u16;
    frame.set_cursor_position(Position::new(
        cursor_x.min(header_chunks[0].right().saturating_sub(1)),
        header_area.y,
    ));

    if entries.is_empty() {
        let key = if ctx.total == 0 { "empty-history" } else { "no-match" };
        frame.render_widget(
            Paragraph::new(Span::styled(voc.get(key).to_string(), theme.preview_placeholder)),
            list_area,
        );
        return list_area;
    }

    let id_width = if ctx.show_numbers { id_column_width(entries) } else { 0 };
    // One column of spacing before the preview and before the marker
    let preview_width = list_area
        .width
        .saturating_sub(id_width)
        .saturating_sub(if ctx.show_numbers { 1 } else { 0 })
        .saturating_sub(2) as usize;

    let rows = render_rows(entries, state.selected(), ctx.show_numbers, preview_width, theme);

    // The preview column fills, which pins the marker to the right edge
    let table = if ctx.show_numbers {
        Table::new(
            rows,
            [Constraint::Length(id_width), Constraint::Fill(1), Constraint::Length(1)],
        )
    } else {
        Table::new(rows, [Constraint::Fill(1), Constraint::Length(1)])
    };

    frame.render_stateful_widget(table, list_area, state);
    list_area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_column_width() {
        let a = HistoryEntry::new("7", "x");
        let b = HistoryEntry::new("12345", "y");
        assert_eq!(id_column_width(&[&a]), 3);
        assert_eq!(id_column_width(&[&a, &b]), 5);
        assert_eq!(id_column_width(&[]), 3);
    }
}
