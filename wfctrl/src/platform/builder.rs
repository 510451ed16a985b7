use std::error::Error;
use clap::{ArgAction, Parser};
use wfcore::flow::Registry;
use wfdb::{
    Backend,
    ConnectorOption,
};
use wfrbac::Builder as GateBuilder;

use super::Platform;

#[derive(Clone, Debug, Default, Parser)]
pub struct Builder {
    #[clap(
        long,
        value_name = "WF_AUTO_CREATE_DB",
        env = "WF_AUTO_CREATE_DB",
        action = ArgAction::Set,
        default_value_t = true,
        default_missing_value = "true",
    )]
    pub wf_auto_create_db: bool,
    #[clap(long, value_name = "WF_DB_URL", env = "WF_DB_URL")]
    pub wf_db_url: String,
    #[clap(
        long,
        value_name = "WF_REQUESTER_VIEW",
        env = "WF_REQUESTER_VIEW",
        action = ArgAction::Set,
        default_value_t = true,
        default_missing_value = "true",
    )]
    pub wf_requester_view: bool,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wf_auto_create_db(mut self, value: bool) -> Self {
        self.wf_auto_create_db = value;
        self
    }

    pub fn wf_db_url(mut self, value: String) -> Self {
        self.wf_db_url = value;
        self
    }

    pub fn wf_requester_view(mut self, value: bool) -> Self {
        self.wf_requester_view = value;
        self
    }

    pub async fn build(
        self,
        registry: Registry,
    ) -> Result<Platform, Box<dyn Error + Send + Sync>> {
        Ok(Platform::new(
            registry,
            Box::new(
                GateBuilder::new()
                    .requester_view(self.wf_requester_view)
                    .build()
            ),
            Backend::platform(
                ConnectorOption::from(&self.wf_db_url)
                    .auto_create_db(self.wf_auto_create_db)
            )
                .await?,
        ))
    }
}
