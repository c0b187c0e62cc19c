pub mod add_task_dialog;
pub mod color;
pub mod controls;
pub mod help;
pub mod stats;
pub mod status_bar;
pub mod task_table;
pub mod text_input;
