use std::{
    fmt,
    str::FromStr,
};
use crate::error::ValueError;
use super::*;

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Identifier::Initial => f.write_str(REQUEST_IDENTIFIER),
            Identifier::Id(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for Identifier {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            REQUEST_IDENTIFIER => Ok(Identifier::Initial),
            s => s.parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .map(Identifier::Id)
                .ok_or_else(|| ValueError::Unsupported(s.to_string())),
        }
    }
}
