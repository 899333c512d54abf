pub mod dialogs;
pub mod toolbar;
