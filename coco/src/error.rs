use std::path::PathBuf;

pub type CocoResult<T> = Result<T, CocoError>;

#[derive(thiserror::Error, Debug)]
pub enum CocoError {
    #[error("no category matches mask file `{file}`")]
    UnknownCategory { file: String },

    #[error("failed to read image {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CocoError {
    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}
