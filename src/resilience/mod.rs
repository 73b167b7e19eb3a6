pub mod policy;
pub mod retry;

pub use policy::RetryPolicy;
pub use retry::publish_with_retry;
