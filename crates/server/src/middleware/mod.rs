pub mod access_control;
pub mod license;
pub mod request_id;

pub use access_control::{AccessContext, require_auth};
pub use license::require_license;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
