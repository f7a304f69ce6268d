//! Top-level rendering coordinator.
//!
//! Computes the view model from state and hands it to the component layout.
//! Zellij clears the pane before each render, so nothing here erases.
//!
//! # Example
//!
//! ```rust,no_run
//! use vendorizer::app::AppState;
//! use vendorizer::catalog::seed;
//! use vendorizer::ui::{render, Theme};
//!
//! let state = AppState::new(seed::bundled()?, Theme::default());
//! render(&state, 24, 80);
//! # Ok::<(), vendorizer::domain::VendorizerError>(())
//! ```

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI to stdout.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel(rows, cols);
    components::render_layout(&viewmodel, &state.theme, rows, cols);
}
