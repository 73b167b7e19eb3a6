pub mod clock;
pub mod scheduler;

pub use clock::{Clock, SystemClock};
pub use scheduler::{PublishScheduler, TickReport};
