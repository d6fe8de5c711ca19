//! Shared application state.
//!
//! A single `AppState` instance is constructed at startup and threaded by
//! mutable reference into the event loop and every mode handler. Mutators
//! only assign; `notify` is the one entry point toward the renderer.

/// Interaction mode governing how input events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Browsing the branch list
    #[default]
    View,
    /// Typing a filter string
    Filter,
    /// Confirming a branch deletion
    Delete,
    /// Typing a new name for the selected branch
    Rename,
    /// Typing the name of a branch to create off the selection
    NewBranch,
    /// Showing a diagnostic until dismissed
    Error,
}

/// Terminal size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub width: u16,
    pub height: u16,
}

/// Render callback invoked synchronously on every state change.
pub type Subscriber = Box<dyn FnMut(&AppState)>;

/// The single mutable model behind the UI.
///
/// `branches` is the source of truth, refreshed from the branch provider
/// after any mutating operation; `filtered_branches` is the view derived
/// from it by substring containment against `filter`.
pub struct AppState {
    branches: Vec<String>,
    filtered_branches: Vec<String>,
    current_branch: String,
    mode: Mode,
    filter: String,
    rename: String,
    new_branch: String,
    selected_row: usize,
    status: String,
    dimensions: Dimensions,
    subscriber: Option<Subscriber>,
}

impl AppState {
    pub fn new(
        branches: Vec<String>,
        current_branch: String,
        status: String,
        dimensions: Dimensions,
    ) -> Self {
        let filtered_branches = branches.clone();
        Self {
            branches,
            filtered_branches,
            current_branch,
            mode: Mode::View,
            filter: String::new(),
            rename: String::new(),
            new_branch: String::new(),
            selected_row: 0,
            status,
            dimensions,
            subscriber: None,
        }
    }

    /// Register the render subscriber, replacing any previous one.
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscriber = Some(subscriber);
    }

    /// Invoke the subscriber with the current state.
    ///
    /// The callback is moved out for the duration of the call so it can
    /// borrow the state it is handed.
    pub fn notify(&mut self) {
        if let Some(mut subscriber) = self.subscriber.take() {
            subscriber(self);
            self.subscriber = Some(subscriber);
        }
    }

    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    pub fn set_branches(&mut self, branches: Vec<String>) {
        self.branches = branches;
    }

    pub fn filtered_branches(&self) -> &[String] {
        &self.filtered_branches
    }

    pub fn set_filtered_branches(&mut self, branches: Vec<String>) {
        self.filtered_branches = branches;
    }

    pub fn current_branch(&self) -> &str {
        &self.current_branch
    }

    pub fn set_current_branch(&mut self, branch: String) {
        self.current_branch = branch;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: String) {
        self.filter = filter;
    }

    pub fn rename(&self) -> &str {
        &self.rename
    }

    pub fn set_rename(&mut self, rename: String) {
        self.rename = rename;
    }

    pub fn new_branch(&self) -> &str {
        &self.new_branch
    }

    pub fn set_new_branch(&mut self, new_branch: String) {
        self.new_branch = new_branch;
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn set_selected_row(&mut self, row: usize) {
        self.selected_row = row;
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: String) {
        self.status = status;
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
    }

    /// The branch under the cursor, `None` when the filtered list is empty
    /// or the selection is out of bounds.
    #[must_use]
    pub fn selected_branch(&self) -> Option<&str> {
        self.filtered_branches
            .get(self.selected_row)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn test_state() -> AppState {
        AppState::new(
            vec!["main".to_string(), "feat/a".to_string()],
            "main".to_string(),
            "ready".to_string(),
            Dimensions {
                width: 80,
                height: 24,
            },
        )
    }

    #[test]
    fn test_new_state_defaults() {
        let state = test_state();
        assert_eq!(state.mode(), Mode::View);
        assert_eq!(state.selected_row(), 0);
        assert_eq!(state.filtered_branches(), state.branches());
        assert_eq!(state.current_branch(), "main");
        assert_eq!(state.status(), "ready");
        assert!(state.filter().is_empty());
    }

    #[test]
    fn test_selected_branch_in_bounds() {
        let mut state = test_state();
        assert_eq!(state.selected_branch(), Some("main"));
        state.set_selected_row(1);
        assert_eq!(state.selected_branch(), Some("feat/a"));
    }

    #[test]
    fn test_selected_branch_out_of_bounds() {
        let mut state = test_state();
        state.set_selected_row(5);
        assert_eq!(state.selected_branch(), None);

        state.set_filtered_branches(Vec::new());
        state.set_selected_row(0);
        assert_eq!(state.selected_branch(), None);
    }

    #[test]
    fn test_notify_without_subscriber() {
        let mut state = test_state();
        state.notify();
    }

    #[test]
    fn test_notify_invokes_subscriber() {
        let mut state = test_state();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        state.subscribe(Box::new(move |s| {
            assert_eq!(s.current_branch(), "main");
            seen.set(seen.get() + 1);
        }));

        state.notify();
        state.notify();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_resubscribe_replaces_subscriber() {
        let mut state = test_state();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let counter = Rc::clone(&first);
        state.subscribe(Box::new(move |_| counter.set(counter.get() + 1)));
        let counter = Rc::clone(&second);
        state.subscribe(Box::new(move |_| counter.set(counter.get() + 1)));

        state.notify();
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_dimensions_update() {
        let mut state = test_state();
        state.set_dimensions(Dimensions {
            width: 120,
            height: 40,
        });
        assert_eq!(state.dimensions().width, 120);
        assert_eq!(state.dimensions().height, 40);
    }
}
