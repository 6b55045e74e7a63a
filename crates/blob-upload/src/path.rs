use std::fmt;

use roster_config::{IMAGE_EXTENSION, IMAGE_PREFIX};
use uuid::Uuid;

/// Slash-separated, relative location of a blob inside its store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlobPath(String);

impl BlobPath {
    /// A fresh `images/<uuid-v4>.jpg`, whatever the source file type.
    pub fn random_image() -> Self {
        Self(format!("{IMAGE_PREFIX}/{}.{IMAGE_EXTENSION}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_image_has_prefix_and_extension() {
        let path = BlobPath::random_image();
        assert!(path.as_str().starts_with("images/"));
        assert!(path.as_str().ends_with(".jpg"));

        let stem = path
            .as_str()
            .trim_start_matches("images/")
            .trim_end_matches(".jpg");
        assert!(Uuid::parse_str(stem).is_ok());
    }

    #[test]
    fn random_images_are_distinct() {
        assert_ne!(BlobPath::random_image(), BlobPath::random_image());
    }

    #[test]
    fn segments_split_on_slash() {
        let path = BlobPath::random_image();
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], "images");
    }
}
