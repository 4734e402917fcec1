use std::path::PathBuf;

pub type SceneResult<T> = Result<T, SceneError>;

#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// A resolver read a parameter that is declared later (or not at all).
    #[error("parameter `{key}` read before it was resolved")]
    DependencyOrder { key: String },

    #[error("parameter `{key}` is a {found}, expected {expected}")]
    ParamType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid parameter space: {0}")]
    Configuration(String),

    #[error("{primitive} has nothing to draw from in {pool}")]
    EmptyResourcePool {
        primitive: &'static str,
        pool: String,
    },

    #[error("{primitive} was read before a successful sample")]
    Unsampled { primitive: &'static str },

    #[error("failed to load {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SceneError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn empty_pool(primitive: &'static str, pool: impl Into<String>) -> Self {
        Self::EmptyResourcePool {
            primitive,
            pool: pool.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = SceneError::DependencyOrder { key: "_wh".into() };
        assert!(err.to_string().contains("`_wh`"));

        let err = SceneError::empty_pool("Photo", "photos/");
        assert!(err.to_string().starts_with("Photo has nothing"));

        let err = SceneError::Unsampled {
            primitive: "Rectangle",
        };
        assert!(err.to_string().contains("before a successful sample"));
    }
}
