pub use error::{Error, Result};

mod error;
pub mod osc;
pub mod progress;
pub mod style;
pub mod upscale;
