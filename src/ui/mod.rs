pub mod config_dialog;
pub mod input;
pub mod overlay;
pub mod tooltip;
