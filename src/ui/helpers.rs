use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// `"Meccan • 7 Ayahs"`, shown on list cards and the detail header.
pub(crate) fn meta_line(origin: &str, verse_count: u32) -> String {
    format!("{origin} • {verse_count} Ayahs")
}

/// Range of rows to draw so that `selected` stays visible in a viewport of
/// `capacity` rows out of `len`.
pub(crate) fn visible_window(selected: usize, capacity: usize, len: usize) -> (usize, usize) {
    let capacity = capacity.max(1);
    let mut start = if selected >= capacity {
        selected + 1 - capacity
    } else {
        0
    };
    if start + capacity > len {
        start = len.saturating_sub(capacity);
    }
    (start, (start + capacity).min(len))
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the loading and failure messages.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn window_follows_selection() {
        assert_eq!(visible_window(0, 3, 10), (0, 3));
        assert_eq!(visible_window(2, 3, 10), (0, 3));
        assert_eq!(visible_window(3, 3, 10), (1, 4));
        assert_eq!(visible_window(9, 3, 10), (7, 10));
        assert_eq!(visible_window(0, 5, 2), (0, 2));
        assert_eq!(visible_window(0, 0, 0), (0, 0));
    }

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = anyhow!("disk on fire").context("failed to load");
        assert_eq!(surface_error(&err), "disk on fire");
    }

    #[test]
    fn meta_line_formats_origin_and_count() {
        assert_eq!(meta_line("Medinan", 286), "Medinan • 286 Ayahs");
    }
}
