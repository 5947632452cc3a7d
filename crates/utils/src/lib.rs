pub mod env;
pub mod response;
pub mod sentry;
