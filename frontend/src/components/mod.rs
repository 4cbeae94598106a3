pub mod form_section;
pub mod header;
pub mod results;
pub mod theme_toggle;
pub mod utils;
