pub mod calendar;
pub mod footer;
pub mod form_item;
pub mod status;
