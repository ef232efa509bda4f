pub use crate::core::app::App;
pub use switchboard_types::error::{ClResult, Error};
pub use switchboard_types::types::Timestamp;

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
