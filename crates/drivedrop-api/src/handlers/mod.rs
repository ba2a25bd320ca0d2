pub mod form_page;
pub mod upload;
