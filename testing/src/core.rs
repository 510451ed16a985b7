use async_trait::async_trait;
use mockall::mock;
use wfcore::{
    ac::{
        Principal,
        Role,
        traits::PrincipalBackend,
    },
    activity::{
        ActivityRecord,
        Fields,
        traits::ActivityBackend,
    },
    error::{
        BackendError,
        task::TaskError,
    },
    flow::Transition,
    platform::{
        DefaultWFPlatform,
        PlatformUrl,
    },
    request::{
        Request,
        Requests,
        traits::RequestBackend,
    },
    task::{
        Task,
        Tasks,
        traits::TaskBackend,
    },
    workflow::{
        Advanced,
        Engaged,
        Initiated,
        RolledBack,
        traits::WorkflowBackend,
    },
};

mock! {
    pub Platform {}

    #[async_trait]
    impl RequestBackend for Platform {
        async fn get_request(&self, id: i64) -> Result<Option<Request>, BackendError>;
        async fn list_requests_for_module(&self, module: &str) -> Result<Requests, BackendError>;
        async fn list_requests_for_requester(&self, requester_id: i64) -> Result<Requests, BackendError>;
        async fn withdraw_request(&self, id: i64) -> Result<Request, TaskError>;
    }

    #[async_trait]
    impl TaskBackend for Platform {
        async fn get_task(&self, id: i64) -> Result<Option<Task>, BackendError>;
        async fn list_tasks_for_request(&self, request_id: i64) -> Result<Tasks, BackendError>;
    }

    #[async_trait]
    impl ActivityBackend for Platform {
        async fn get_activity_record(
            &self,
            id: i64,
        ) -> Result<Option<ActivityRecord>, BackendError>;
        async fn get_activity_record_for_task(
            &self,
            task_id: i64,
        ) -> Result<Option<ActivityRecord>, BackendError>;
    }

    #[async_trait]
    impl WorkflowBackend for Platform {
        async fn initiate_request(
            &self,
            requester_id: i64,
            module: &str,
            activity: &str,
            assignee: &Role,
            record: ActivityRecord,
        ) -> Result<Initiated, TaskError>;
        async fn engage_task(
            &self,
            task_id: i64,
            updated_by: i64,
            record: ActivityRecord,
        ) -> Result<Engaged, TaskError>;
        async fn save_activity(
            &self,
            task_id: i64,
            updated_by: i64,
            fields: Fields,
        ) -> Result<Engaged, TaskError>;
        async fn advance_task(
            &self,
            task_id: i64,
            updated_by: i64,
            transition: &Transition,
        ) -> Result<Advanced, TaskError>;
        async fn finish_task(
            &self,
            task_id: i64,
            updated_by: i64,
        ) -> Result<Advanced, TaskError>;
        async fn rollback_task(
            &self,
            task_id: i64,
            updated_by: i64,
        ) -> Result<RolledBack, TaskError>;
    }

    #[async_trait]
    impl PrincipalBackend for Platform {
        async fn add_principal(&self, name: &str, elevated: bool) -> Result<i64, BackendError>;
        async fn get_principal_by_id(&self, id: i64) -> Result<Option<Principal>, BackendError>;
        async fn get_principal_by_name(&self, name: &str) -> Result<Option<Principal>, BackendError>;
        async fn grant_role_to_principal(&self, id: i64, role: &Role) -> Result<bool, BackendError>;
        async fn revoke_role_from_principal(&self, id: i64, role: &Role) -> Result<bool, BackendError>;
    }

    impl PlatformUrl for Platform {
        fn url(&self) -> &str;
    }
}

impl DefaultWFPlatform for MockPlatform {}
