pub mod event_handlers;
pub mod event_loop;
pub mod state;
pub mod theme;
pub mod view;

pub use event_loop::TuiApp;
pub use theme::Theme;
