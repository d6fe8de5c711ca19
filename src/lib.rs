// Library modules
pub mod actions;
pub mod config;
pub mod git;
pub mod input;
pub mod state;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use git::{BranchManager, BranchProvider};
pub use input::InputEvent;
pub use state::{AppState, Dimensions, Mode};
