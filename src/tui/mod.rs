pub mod app;
pub mod dialog;
pub mod error;
pub mod events;
pub mod layout;
pub mod render;
pub mod widgets;

pub use app::{App, Mode, Severity};
pub use dialog::{AddTaskDialog, DialogResponse, NewTaskRequest};
pub use error::TuiError;
pub use events::{KeyMap, run_event_loop};
pub use layout::Layout;
pub use render::render;
