//! Terminal rendering.
//!
//! Draws two regions from a state snapshot: the branch list with the
//! selection highlight and a current-branch marker, and a status panel
//! whose height follows its content.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::state::AppState;

/// Render a full frame from the given state snapshot.
pub fn draw(frame: &mut Frame, state: &AppState) {
    let status_height = status_height(state.status(), state.dimensions().width);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(status_height)])
        .split(frame.area());

    let current = state.current_branch();
    let items: Vec<ListItem> = state
        .filtered_branches()
        .iter()
        .map(|branch| {
            if branch == current {
                ListItem::new(format!("{branch} ← current "))
            } else {
                ListItem::new(branch.clone())
            }
        })
        .collect();

    let mut list_state = ListState::default();
    if !state.filtered_branches().is_empty() {
        list_state.select(Some(state.selected_row()));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Branches"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, chunks[0], &mut list_state);

    let status = Paragraph::new(state.status().to_string())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, chunks[1]);
}

/// Status panel height: borders plus at least two content rows, plus one
/// extra row for every status line that wraps at the panel width.
pub fn status_height(status: &str, width: u16) -> u16 {
    let lines: Vec<&str> = status.split('\n').collect();
    let mut rows = lines.len().max(2);
    for line in &lines {
        if line.len() + 2 > width as usize {
            rows += 1;
        }
    }
    rows as u16 + 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::VIEW_STATUS;
    use crate::state::Dimensions;
    use ratatui::{backend::TestBackend, Terminal};

    fn test_state() -> AppState {
        AppState::new(
            vec!["main".to_string(), "feat/a".to_string()],
            "main".to_string(),
            VIEW_STATUS.to_string(),
            Dimensions {
                width: 100,
                height: 30,
            },
        )
    }

    #[test]
    fn test_status_height_minimum_two_rows() {
        assert_eq!(status_height("one line", 80), 4);
        assert_eq!(status_height("", 80), 4);
    }

    #[test]
    fn test_status_height_counts_lines() {
        assert_eq!(status_height("a\nb\nc", 80), 5);
    }

    #[test]
    fn test_status_height_adds_rows_for_wrapped_lines() {
        // Each line longer than width - 2 needs an extra row
        let long = "x".repeat(50);
        assert_eq!(status_height(&long, 20), 5);
        assert_eq!(status_height(&format!("{long}\n{long}"), 20), 6);
    }

    #[test]
    fn test_draw_marks_current_branch() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let state = test_state();

        terminal.draw(|frame| draw(frame, &state)).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Branches"));
        assert!(content.contains("Status"));
        assert!(content.contains("← current"));
        assert!(content.contains("feat/a"));
    }

    #[test]
    fn test_draw_empty_branch_list() {
        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = test_state();
        state.set_filtered_branches(Vec::new());

        terminal.draw(|frame| draw(frame, &state)).unwrap();
    }
}
