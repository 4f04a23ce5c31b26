//! Request extractors that reject with [`Error`] instead of plain text.
//!
//! Every rejection renders as the uniform JSON error body with a 400
//! `bad-request` status.
//!
//! [`Error`]: crate::handler::Error

mod enhanced_json;
mod enhanced_path;
mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::validated_json::ValidateJson;
