//! Terminal UI components for the console mode.

mod spinner;
mod theme;

pub use spinner::Spinner;
pub use theme::Style;
