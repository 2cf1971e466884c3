pub mod layout;
pub mod preview;
pub mod section_editor;
