use std::fmt;
use std::sync::Arc;

mod error;
mod utils;

pub use error::{Error, Result};

/// The maximum allowed length for a [`ContainerID`].
const CONTAINER_ID_MAX_LEN: usize = 255;

/// A validated container identifier, as assigned by the container runtime.
///
/// Only non-empty, lowercase alphanumeric ids are accepted, which makes an id
/// safe to splice into a runtime API path.
///
/// # Examples
///
/// ```
/// # use docker_stats_exporter::container::{ContainerID, Error};
/// let raw_id = "abc123abc123abc123abc123abc123abc123abc123abc123abc123abc123abcd";
/// let container_id = ContainerID::new(raw_id).unwrap();
/// assert_eq!(container_id.as_ref(), "abc123abc123abc123abc123abc123abc123abc123abc123abc123abc123abcd");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerID(Arc<str>);

impl ContainerID {
    /// Creates a new `ContainerID` from the given raw id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContainerID`] if the input is empty, longer than
    /// [`CONTAINER_ID_MAX_LEN`] or contains anything other than `a-z` and `0-9`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use docker_stats_exporter::container::{ContainerID, Error};
    /// let valid = "abcdef012345abcdef012345abcdef012345abcdef012345abcdef012345abcd";
    /// assert!(ContainerID::new(valid).is_ok());
    /// assert!(ContainerID::new("../images/json").is_err());
    /// ```
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.is_empty()
            || src.len() > CONTAINER_ID_MAX_LEN
            || !utils::is_lowercase_alpha_numeric(src.as_bytes())
        {
            return Err(Error::InvalidContainerID(src.to_owned()));
        }

        Ok(Self(src.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ContainerID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for ContainerID {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}
