use serde::{
    Deserialize,
    Serialize,
};
use wfcore::{
    activity::traits::ActivityData,
    error::FieldErrors,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Baz {
    #[serde(rename = "CR")]
    Corge,
    #[serde(rename = "WL")]
    Waldo,
}

/// The initial activity of the sample module.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Foo {
    pub bar: String,
    pub baz: Baz,
    #[serde(default)]
    pub qux: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Corge {
    pub grault: String,
    pub thud: i64,
}

fn validate_initial_cap(errors: &mut FieldErrors, field: &str, value: &str) {
    if !value.chars().next().is_some_and(char::is_uppercase) {
        errors.add(field, "First character should be capital");
    }
}

fn validate_max_length(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("Ensure this value has at most {max} characters"));
    }
}

impl ActivityData for Foo {
    const TITLE: &'static str = "Foo";

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_initial_cap(&mut errors, "bar", &self.bar);
        validate_max_length(&mut errors, "bar", &self.bar, 200);
        errors.into_result().map_err(|e| e.0)
    }
}

impl ActivityData for Corge {
    const TITLE: &'static str = "Corge";

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_max_length(&mut errors, "grault", &self.grault, 50);
        errors.into_result().map_err(|e| e.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn foo() -> anyhow::Result<()> {
        let foo: Foo = serde_json::from_str(r#"{"bar": "Example", "baz": "WL"}"#)?;
        assert_eq!(foo, Foo {
            bar: "Example".into(),
            baz: Baz::Waldo,
            qux: "".into(),
        });
        assert!(foo.validate().is_ok());

        let errors = Foo { bar: "example".into(), .. foo.clone() }
            .validate()
            .expect_err("lowercase initial");
        assert_eq!(
            errors.field("bar"),
            Some(&["First character should be capital".to_string()][..]),
        );

        let errors = Foo { bar: "".into(), .. foo.clone() }
            .validate()
            .expect_err("empty");
        assert!(errors.field("bar").is_some());

        let errors = Foo { bar: format!("E{}", "x".repeat(200)), .. foo }
            .validate()
            .expect_err("too long");
        assert_eq!(errors.field("bar").map(<[String]>::len), Some(1));

        assert!(serde_json::from_str::<Foo>(r#"{"bar": "Example", "baz": "XY"}"#).is_err());
        Ok(())
    }

    #[test]
    fn corge() -> anyhow::Result<()> {
        let corge: Corge = serde_json::from_str(r#"{"grault": "Fine", "thud": 3}"#)?;
        assert!(corge.validate().is_ok());
        let errors = Corge { grault: "x".repeat(51), thud: 3 }
            .validate()
            .expect_err("too long");
        assert!(errors.field("grault").is_some());
        assert!(serde_json::from_str::<Corge>(r#"{"grault": "Fine"}"#).is_err());
        Ok(())
    }
}
