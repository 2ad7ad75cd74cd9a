//! Shared HTTP building blocks: response envelope, error mapping, extractors

mod api_error;
mod api_response;
mod validated_json;

pub use api_error::ApiError;
pub use api_response::ApiResponse;
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
