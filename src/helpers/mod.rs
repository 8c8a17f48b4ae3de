pub mod api_error;
pub mod handler_404;
pub mod text;
