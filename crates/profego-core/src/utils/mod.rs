pub mod format;
pub mod validate;

pub use format::{format_date, format_file_size};
pub use validate::is_valid_email;
