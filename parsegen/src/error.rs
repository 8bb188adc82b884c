use std::error;
use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A left set was requested for, or a call synthesized to, a rule the
    /// grammar doesn't have.
    UnknownRule(String),
    /// A rule whose routine would collide with a bootstrap routine.
    ReservedName(String),
    /// Two rules whose routines would render under the same name.
    NameCollision(String, String),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::UnknownRule(ref rule) => write!(f, "unknown rule '{}'", rule),
            Error::ReservedName(ref rule) => write!(
                f,
                "rule '{}' collides with a generated routine of the same name",
                rule
            ),
            Error::NameCollision(ref first, ref second) => write!(
                f,
                "rules '{}' and '{}' collide as generated routines",
                first, second
            ),
        }
    }
}

impl error::Error for Error {}
