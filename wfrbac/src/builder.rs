use crate::gate::Gate;

/// Builds the access control [`Gate`].
///
/// Methods can be chained in order to set the configuration values.
/// New instances of the builder can be obtained via `Builder::default`,
/// which denies everything beyond role membership, or `Builder::new`,
/// which lets elevated principals bypass every check and lets the
/// requester view the tasks of their own requests.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    pub(crate) elevated_bypass: bool,
    pub(crate) requester_view: bool,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            elevated_bypass: true,
            requester_view: true,
        }
    }

    pub fn elevated_bypass(mut self, val: bool) -> Self {
        self.elevated_bypass = val;
        self
    }

    pub fn requester_view(mut self, val: bool) -> Self {
        self.requester_view = val;
        self
    }

    pub fn build(&self) -> Gate {
        log::trace!("building a Gate with {self:?}");
        Gate {
            elevated_bypass: self.elevated_bypass,
            requester_view: self.requester_view,
        }
    }
}
