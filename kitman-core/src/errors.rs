pub use kitman_error::{GatewayError, KitmanError, ShapeError};

/// Result type alias for kitman operations
pub type Result<T> = anyhow::Result<T>;
