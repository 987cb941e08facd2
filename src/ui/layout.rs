use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Regions of the main screen
pub struct MainLayout {
    pub clip_list: Rect,
    pub divider: Rect,
    pub preview: Rect,
    pub keyboard_hints: Rect,
}

/// List on the left, preview on the right, one row of hints underneath
pub fn create_main_layout(area: Rect) -> MainLayout {
    let [content, keyboard_hints] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    let [clip_list, divider, preview] = Layout::horizontal([
        Constraint::Percentage(45),
        Constraint::Length(1),
        Constraint::Min(10),
    ])
    .areas(content);

    MainLayout {
        clip_list,
        divider,
        preview,
        keyboard_hints,
    }
}

/// Rectangle of the given percentage size centered in `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(r);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_covers_width() {
        let layout = create_main_layout(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.keyboard_hints.height, 1);
        assert_eq!(layout.keyboard_hints.y, 29);
        assert_eq!(
            layout.clip_list.width + layout.divider.width + layout.preview.width,
            100
        );
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 80, 24);
        let inner = centered_rect(50, 50, outer);
        assert!(inner.x > 0 && inner.y > 0);
        assert!(inner.right() <= outer.right() && inner.bottom() <= outer.bottom());
    }
}
