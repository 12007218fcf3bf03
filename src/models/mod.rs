pub mod catalog;
pub mod entry;
pub mod material;
pub mod state;
