pub mod etl;
pub mod exporter;
pub mod paginator;
pub mod pipeline;

pub use crate::domain::model::{ExtractResult, TransformResult};
pub use crate::domain::ports::{CardSource, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
