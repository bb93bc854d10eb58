pub mod error_handler;
pub mod event_handler;

pub use error_handler::on_error;
pub use event_handler::event_handler;
