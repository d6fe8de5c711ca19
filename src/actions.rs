//! Interaction controller: the mode state machine behind the UI.
//!
//! `dispatch` routes each translated input event to the handler for the
//! current mode, then notifies the render subscriber unconditionally - even
//! for events that changed nothing, which keeps the render pipeline correct
//! under glitchy event sources. Resize events bypass mode dispatch.

use crate::git::BranchProvider;
use crate::input::InputEvent;
use crate::state::{AppState, Dimensions, Mode};

pub const VIEW_STATUS: &str =
    "d: Delete | n: New | /: Filter | c: Checkout | r: Rename | [q|esc|ctrl-c]: Quit";
pub const FILTER_STATUS: &str = "Enter: Confirm filter | Esc: Clear filter and quit filter mode";
pub const RENAME_STATUS: &str = "Enter: Confirm rename | Esc: Exit rename mode";
pub const NEW_BRANCH_STATUS: &str = "Enter: Confirm create branch| Esc: Exit new branch mode";

const OUT_OF_BOUNDS: &str = "Selection out of bounds";

/// Route `event` to the handler for the current mode, then notify the
/// render subscriber. `exit` is invoked when a quit key is handled in View
/// mode; actual teardown belongs to the event loop.
pub fn dispatch(
    event: InputEvent,
    state: &mut AppState,
    provider: &dyn BranchProvider,
    exit: &mut dyn FnMut(),
) {
    // Resize applies in every mode and never touches selection or mode.
    if let InputEvent::Resize { width, height } = event {
        state.set_dimensions(Dimensions { width, height });
        state.notify();
        return;
    }

    match state.mode() {
        Mode::View => view_mode(event, state, provider, exit),
        Mode::Filter => filter_mode(event, state, provider),
        Mode::Delete => delete_mode(event, state, provider),
        Mode::Rename => rename_mode(event, state, provider),
        Mode::NewBranch => new_branch_mode(event, state, provider),
        Mode::Error => error_mode(event, state),
    }

    state.notify();
}

// Mode handlers

fn view_mode(
    event: InputEvent,
    state: &mut AppState,
    provider: &dyn BranchProvider,
    exit: &mut dyn FnMut(),
) {
    let row = state.selected_row();
    let rows = state.filtered_branches().len();
    match event {
        InputEvent::Char('j') | InputEvent::Down => {
            if row + 1 < rows {
                state.set_selected_row(row + 1);
            }
        }
        InputEvent::Char('k') | InputEvent::Up => {
            if row > 0 {
                state.set_selected_row(row - 1);
            }
        }
        InputEvent::Home => state.set_selected_row(0),
        InputEvent::Char('G') | InputEvent::End => {
            state.set_selected_row(rows.saturating_sub(1));
        }
        InputEvent::Char('/') => enter_filter(state, provider),
        InputEvent::Char('d') => enter_delete(state),
        InputEvent::Char('r') => enter_rename(state),
        InputEvent::Char('n') => enter_new_branch(state),
        InputEvent::Char('c') => checkout_selected(state, provider),
        InputEvent::Char('q') | InputEvent::Escape => exit(),
        _ => {}
    }
}

fn filter_mode(event: InputEvent, state: &mut AppState, provider: &dyn BranchProvider) {
    match event {
        InputEvent::Char(c) => {
            let mut filter = state.filter().to_string();
            filter.push(c);
            apply_filter(state, provider, filter);
        }
        InputEvent::Backspace => {
            let mut filter = state.filter().to_string();
            if filter.pop().is_some() {
                apply_filter(state, provider, filter);
            }
        }
        InputEvent::Escape => {
            apply_filter(state, provider, String::new());
            enter_view(state);
        }
        InputEvent::Enter => enter_view(state),
        _ => {}
    }
}

fn delete_mode(event: InputEvent, state: &mut AppState, provider: &dyn BranchProvider) {
    match event {
        InputEvent::Char('y') | InputEvent::Char('Y') => {
            // The mode transition is decided before the refresh; the refresh
            // runs on both outcomes and completes before dispatch notifies.
            match state.selected_branch().map(str::to_string) {
                Some(name) => match provider.delete(&name) {
                    Ok(()) => enter_view(state),
                    Err(err) => enter_error(state, &format!("{err:#}")),
                },
                None => enter_error(state, OUT_OF_BOUNDS),
            }
            refresh_branches(state, provider);
        }
        InputEvent::Char('n') | InputEvent::Char('N') | InputEvent::Escape => enter_view(state),
        _ => {}
    }
}

fn rename_mode(event: InputEvent, state: &mut AppState, provider: &dyn BranchProvider) {
    match event {
        InputEvent::Char(c) => {
            let mut rename = state.rename().to_string();
            rename.push(c);
            update_rename(state, rename);
        }
        InputEvent::Backspace => {
            let mut rename = state.rename().to_string();
            if rename.pop().is_some() {
                update_rename(state, rename);
            }
        }
        InputEvent::Escape => {
            state.set_rename(String::new());
            enter_view(state);
        }
        InputEvent::Enter => {
            let Some(original) = state.selected_branch().map(str::to_string) else {
                enter_error(state, OUT_OF_BOUNDS);
                return;
            };
            match provider.rename(&original, state.rename()) {
                Ok(()) => {
                    refresh_branches(state, provider);
                    enter_view(state);
                }
                Err(err) => enter_error(state, &format!("{err:#}")),
            }
        }
        _ => {}
    }
}

fn new_branch_mode(event: InputEvent, state: &mut AppState, provider: &dyn BranchProvider) {
    match event {
        InputEvent::Char(c) => {
            let mut name = state.new_branch().to_string();
            name.push(c);
            update_new_branch(state, name);
        }
        InputEvent::Backspace => {
            let mut name = state.new_branch().to_string();
            if name.pop().is_some() {
                update_new_branch(state, name);
            }
        }
        InputEvent::Escape => {
            state.set_new_branch(String::new());
            enter_view(state);
        }
        InputEvent::Enter => {
            let Some(base) = state.selected_branch().map(str::to_string) else {
                enter_error(state, OUT_OF_BOUNDS);
                return;
            };
            match provider.create(state.new_branch(), &base) {
                Ok(()) => {
                    refresh_branches(state, provider);
                    enter_view(state);
                }
                Err(err) => enter_error(state, &format!("{err:#}")),
            }
        }
        _ => {}
    }
}

fn error_mode(event: InputEvent, state: &mut AppState) {
    match event {
        InputEvent::Char('q') | InputEvent::Escape => enter_view(state),
        _ => {}
    }
}

fn checkout_selected(state: &mut AppState, provider: &dyn BranchProvider) {
    let Some(name) = state.selected_branch().map(str::to_string) else {
        enter_error(state, OUT_OF_BOUNDS);
        return;
    };
    match provider.checkout(&name) {
        Ok(()) => {
            state.set_current_branch(name);
            refresh_branches(state, provider);
        }
        Err(err) => enter_error(state, &format!("{err:#}")),
    }
}

// Transitions

fn enter_view(state: &mut AppState) {
    state.set_mode(Mode::View);
    let filter = state.filter();
    let status = if filter.is_empty() {
        VIEW_STATUS.to_string()
    } else {
        format!("Filter: {filter}\n{VIEW_STATUS}")
    };
    state.set_status(status);
}

fn enter_filter(state: &mut AppState, provider: &dyn BranchProvider) {
    state.set_mode(Mode::Filter);
    apply_filter(state, provider, String::new());
}

fn enter_delete(state: &mut AppState) {
    match state.selected_branch().map(str::to_string) {
        None => enter_error(state, OUT_OF_BOUNDS),
        Some(name) if name == state.current_branch() => {
            enter_error(state, "Unable to delete current branch");
        }
        Some(name) => {
            state.set_status(format!("Delete branch '{name}'? (y,n)"));
            state.set_mode(Mode::Delete);
        }
    }
}

fn enter_rename(state: &mut AppState) {
    if state.selected_branch().is_none() {
        enter_error(state, OUT_OF_BOUNDS);
        return;
    }
    state.set_mode(Mode::Rename);
    update_rename(state, String::new());
}

fn enter_new_branch(state: &mut AppState) {
    if state.selected_branch().is_none() {
        enter_error(state, OUT_OF_BOUNDS);
        return;
    }
    state.set_mode(Mode::NewBranch);
    update_new_branch(state, String::new());
}

fn enter_error(state: &mut AppState, diagnostic: &str) {
    state.set_mode(Mode::Error);
    state.set_status(format!(
        "{}\nPress 'q' or <Escape> to go back to view mode",
        diagnostic.trim()
    ));
}

// Helpers

/// Recompute the filtered view from a fresh branch listing so the filter
/// stays live against out-of-band repository changes. A listing failure
/// falls back to the cached branches.
fn apply_filter(state: &mut AppState, provider: &dyn BranchProvider, filter: String) {
    let branches = match provider.list_branches() {
        Ok(branches) => branches,
        Err(err) => {
            log::warn!("branch listing failed, filtering cached list: {err:#}");
            state.branches().to_vec()
        }
    };
    state.set_filtered_branches(filter_branches(&filter, &branches));
    clamp_selection(state);
    state.set_status(format!("Filter: {filter}█\n{FILTER_STATUS}"));
    state.set_filter(filter);
}

fn update_rename(state: &mut AppState, rename: String) {
    let original = state.selected_branch().unwrap_or_default().to_string();
    state.set_status(format!("Rename: {original} → {rename}█\n{RENAME_STATUS}"));
    state.set_rename(rename);
}

fn update_new_branch(state: &mut AppState, name: String) {
    let base = state.selected_branch().unwrap_or_default().to_string();
    state.set_status(format!("Base: {base} → {name}█\n{NEW_BRANCH_STATUS}"));
    state.set_new_branch(name);
}

/// Re-fetch the branch list and current branch after a mutating operation
/// and recompute the filtered view with the active filter.
fn refresh_branches(state: &mut AppState, provider: &dyn BranchProvider) {
    match provider.list_branches() {
        Ok(branches) => {
            let filtered = filter_branches(state.filter(), &branches);
            state.set_branches(branches);
            state.set_filtered_branches(filtered);
            clamp_selection(state);
        }
        Err(err) => log::warn!("branch refresh failed: {err:#}"),
    }
    match provider.current_branch() {
        Ok(current) => state.set_current_branch(current),
        Err(err) => log::warn!("current branch lookup failed: {err:#}"),
    }
}

fn filter_branches(filter: &str, branches: &[String]) -> Vec<String> {
    branches
        .iter()
        .filter(|branch| branch.contains(filter))
        .cloned()
        .collect()
}

/// Keep the selection inside the filtered list after it is recomputed.
fn clamp_selection(state: &mut AppState) {
    let rows = state.filtered_branches().len();
    if rows == 0 {
        state.set_selected_row(0);
    } else if state.selected_row() >= rows {
        state.set_selected_row(rows - 1);
    }
}
