pub mod loader;
pub mod record;

pub use loader::DetectionFeed;
pub use record::{DetectionRecord, DetectionTable};
