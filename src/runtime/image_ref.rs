use std::fmt;

/// Repository and tag pair taken from a `repo[:tag]` reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageRef {
    pub repository: String,
    pub tag: String,
}

impl ImageRef {
    /// Splits on the first colon only. A registry prefix with a port
    /// (`host:5000/app:v1`) ends up split at the port.
    pub fn parse(reference: &str) -> Self {
        let (repository, tag) = reference.split_once(':').unwrap_or((reference, ""));
        Self {
            repository: repository.to_owned(),
            tag: tag.to_owned(),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tag.is_empty() {
            write!(f, "{}", self.repository)
        } else {
            write!(f, "{}:{}", self.repository, self.tag)
        }
    }
}
