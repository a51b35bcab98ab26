pub mod paths;

pub use paths::{
    absolute, display_path, expand_tilde, format_path_with_tilde, resolve_path, validate_file_size,
};
