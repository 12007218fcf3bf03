pub mod pdf_picker;
pub mod price_form;
pub mod price_screen;
pub mod price_store;
pub mod slice;
