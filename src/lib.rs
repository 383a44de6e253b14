// Library interface for Distview-rs, shared by the viewer and the CLI tools.

pub mod distribution;
pub mod layout;
pub mod render;
pub mod ui;
