pub mod batch;
pub mod error;
pub mod stats;
pub mod transforms;

pub use batch::ImageBatch;
pub use error::TransformError;
pub use stats::{compute_image_mean_and_std, ChannelStats, RunningStats};
pub use transforms::{ComposeTransform, NormalizeTransform, RescaleTransform, Transform};
