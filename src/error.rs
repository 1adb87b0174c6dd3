use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Failed to load label font")]
    FontLoad,

    #[error("Missing pipeline metadata: {0}")]
    MissingMetadata(&'static str),

    #[error("Debug directory is not empty: {0}")]
    DebugDirNotEmpty(std::path::PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
