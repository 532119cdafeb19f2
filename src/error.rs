use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("timeline container `{container_id}` does not exist")]
    ContainerNotFound { container_id: String },

    #[error("invalid date for `{field}`: `{raw}`")]
    InvalidDate { field: &'static str, raw: String },

    #[error("time bar index {index} out of range (len {len})")]
    TimeBarIndexOutOfRange { index: usize, len: usize },

    #[error("render backend failure: {0}")]
    Render(String),
}
