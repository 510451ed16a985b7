use std::{
    fmt,
    str::FromStr,
};
use crate::error::ValueError;
use super::Operation;

impl From<Operation> for &'static str {
    fn from(operation: Operation) -> &'static str {
        match operation {
            Operation::Create => "create",
            Operation::View => "view",
            Operation::Update => "update",
            Operation::Rollback => "rollback",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(<&'static str>::from(*self))
    }
}

impl FromStr for Operation {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "create" => Ok(Operation::Create),
            "view" => Ok(Operation::View),
            "update" => Ok(Operation::Update),
            "rollback" => Ok(Operation::Rollback),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use super::Operation;
    use crate::error::ValueError;

    #[test]
    fn smoke() -> anyhow::Result<()> {
        assert_eq!(Operation::Rollback.to_string(), "rollback");
        assert_eq!(Operation::Update, Operation::from_str("Update")?);
        assert!(matches!(
            Operation::from_str("delete")
                .expect_err("should be an error"),
            ValueError::Unsupported(s) if s == "delete",
        ));
        Ok(())
    }
}
