pub mod component;
pub mod menu_editor;
pub mod nav_bar;

pub(crate) use component::Component;
