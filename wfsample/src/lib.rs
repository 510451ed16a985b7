//! The sample workflow module: a `Foo` submitted by a Submitter is
//! passed on to a Reviewer as a `Corge`, which closes the request.

use wfcore::{
    error::ConfigurationError,
    flow::{
        Activity,
        FlowBuilder,
        Registry,
    },
};

mod activity;

pub use activity::{
    Baz,
    Corge,
    Foo,
};

pub const MODULE: &str = "sample";
pub const FOO_ACTIVITY: &str = "foo_activity";
pub const CORGE_ACTIVITY: &str = "corge_activity";

pub fn foo_to_corge(foo: &Foo) -> bool {
    foo.baz == Baz::Waldo || !foo.qux.is_empty()
}

pub fn flow() -> FlowBuilder {
    FlowBuilder::new(MODULE)
        .activity(
            Activity::<Foo>::new(FOO_ACTIVITY, "Foo Activity", "Submitter")
                .transition(CORGE_ACTIVITY, foo_to_corge)
        )
        .activity(Activity::<Corge>::new(CORGE_ACTIVITY, "Corge Activity", "Reviewer"))
        .initial(FOO_ACTIVITY)
}

/// A registry holding only the sample module.
pub fn registry() -> Result<Registry, ConfigurationError> {
    Registry::builder()
        .flow(flow())
        .build()
}
