use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Strongly typed request identifier backed by ULID.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(pub ulid::Ulid);

impl RequestId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Attempt to parse a caller-supplied id; if absent or invalid, generate a new one.
    pub fn from_supplied_or_new(supplied: Option<&str>) -> Self {
        supplied
            .and_then(|s| s.parse::<RequestId>().ok())
            .unwrap_or_default()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = ulid::Ulid::from_string(s)?;
        Ok(RequestId(id))
    }
}
