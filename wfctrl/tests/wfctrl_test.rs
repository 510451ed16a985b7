use wfcore::{
    ac::Operation,
    activity::Fields,
    error::{
        AccessDenied,
        Error,
        RollbackNotPermitted,
        TransitionDenied,
    },
    flow::Candidates,
    platform::PlatformRefs,
    request::RequestStatus,
    task::TaskStatus,
    workflow::Identifier,
};
use wfctrl::error::{
    CtrlError,
    PlatformError,
};

use test_wf::ctrl::{
    create_sqlite_file_platforms,
    create_sqlite_platform,
};

fn fields(json: &str) -> anyhow::Result<Fields> {
    Ok(serde_json::from_str(json)?)
}

fn core_error(err: PlatformError) -> Error {
    match err {
        PlatformError::CoreError(e) => e,
        e => panic!("expected a core error, got {e:?}"),
    }
}

#[async_std::test]
async fn test_platform_request_lifecycle() -> anyhow::Result<()> {
    let (platform, p) = create_sqlite_platform().await?;

    let initiated = platform.initiate_request(
        "sample",
        &p.submitter,
        &fields(r#"{"bar": "Example", "baz": "WL"}"#)?,
    ).await?;
    let task1 = initiated.task;
    assert_eq!(task1.status, TaskStatus::InProgress);
    assert_eq!(task1.assignee.as_str(), "Submitter");
    assert_eq!(task1.activity, "foo_activity");
    assert_eq!(initiated.request.status, RequestStatus::Initiated);
    assert_eq!(initiated.request.requester_id, p.submitter.id);
    assert_eq!(initiated.record.task_id, Some(task1.id));
    assert_eq!(initiated.record.fields["qux"], "");

    // the reviewer does not hold the role of the first activity
    let err = platform.submit(task1.id, &p.reviewer, Some("corge_activity")).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::AccessDenied(AccessDenied { operation: Operation::Update, .. }),
    ));

    let advanced = platform.submit(task1.id, &p.submitter, Some("corge_activity")).await?;
    assert_eq!(advanced.task.status, TaskStatus::Completed);
    assert_eq!(advanced.request.status, RequestStatus::Initiated);
    let task2 = advanced.successor.expect("a successor task");
    assert_eq!(task2.status, TaskStatus::NotStarted);
    assert_eq!(task2.assignee.as_str(), "Reviewer");
    assert_eq!(task2.activity, "corge_activity");
    assert!(task2.id > task1.id);

    // the completed task can no longer be submitted
    let err = platform.submit(task1.id, &p.submitter, Some("corge_activity")).await;
    assert_eq!(
        core_error(err.unwrap_err()).to_string(),
        format!("task {} is not the active task of its request", task1.id),
    );

    let engaged = platform.assign_and_initiate(
        task2.id,
        &p.reviewer,
        &fields(r#"{"grault": "Fine", "thud": 3}"#)?,
    ).await?;
    assert_eq!(engaged.task.status, TaskStatus::InProgress);
    assert_eq!(engaged.task.updated_by, p.reviewer.id);
    assert_eq!(engaged.record.title, "Corge");

    let finished = platform.finish(task2.id, &p.reviewer).await?;
    assert_eq!(finished.request.status, RequestStatus::Completed);
    assert_eq!(finished.task.status, TaskStatus::Completed);
    assert!(finished.successor.is_none());

    let err = platform.save(
        task2.id,
        &p.reviewer,
        &fields(r#"{"grault": "Again", "thud": 4}"#)?,
    ).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::TransitionDenied(TransitionDenied::RequestClosed(_)),
    ));

    let history = platform.request_history(initiated.request.id, &p.submitter).await?;
    let tasks = history.tasks.expect("tasks loaded");
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|task| task.status == TaskStatus::Completed));
    Ok(())
}

#[async_std::test]
async fn test_platform_submit_terminal() -> anyhow::Result<()> {
    let (platform, p) = create_sqlite_platform().await?;
    let initiated = platform.initiate_request(
        "sample",
        &p.clerk,
        &fields(r#"{"bar": "Example", "baz": "WL"}"#)?,
    ).await?;
    let task2 = platform.submit(initiated.task.id, &p.clerk, Some("corge_activity"))
        .await?
        .successor
        .expect("a successor task");

    let err = platform.submit(task2.id, &p.clerk, None).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::TransitionDenied(TransitionDenied::NotEngaged(_)),
    ));

    platform.create_activity(
        "sample",
        "Corge",
        Identifier::Id(task2.id),
        &p.clerk,
        &fields(r#"{"grault": "Fine", "thud": 1}"#)?,
    ).await?;
    let err = platform.submit(task2.id, &p.clerk, Some("foo_activity")).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::TransitionDenied(TransitionDenied::NotRegistered { .. }),
    ));
    let advanced = platform.submit(task2.id, &p.clerk, None).await?;
    assert_eq!(advanced.request.status, RequestStatus::Completed);
    Ok(())
}

#[async_std::test]
async fn test_platform_invalid_initiate() -> anyhow::Result<()> {
    let (platform, p) = create_sqlite_platform().await?;
    let err = platform.initiate_request(
        "sample",
        &p.submitter,
        &fields(r#"{"bar": "example", "baz": "WL"}"#)?,
    ).await;
    match core_error(err.unwrap_err()) {
        Error::Validation(e) => assert!(e.0.field("bar").is_some()),
        e => panic!("unexpected error {e:?}"),
    }
    assert_eq!(platform.list_requests("sample").await?.len(), 0);
    assert!(platform.backend().get_task(1).await?.is_none());
    assert!(platform.backend().get_task_ref(1).await?.is_none());
    Ok(())
}

#[async_std::test]
async fn test_platform_create_activity_routes() -> anyhow::Result<()> {
    let (platform, p) = create_sqlite_platform().await?;
    let err = platform.create_activity(
        "sample",
        "Corge",
        Identifier::Initial,
        &p.submitter,
        &fields(r#"{"grault": "Fine", "thud": 1}"#)?,
    ).await;
    assert!(matches!(
        err.unwrap_err(),
        PlatformError::CtrlError(CtrlError::TitleMismatch { .. }),
    ));

    let engaged = platform.create_activity(
        "sample",
        "Foo",
        Identifier::Initial,
        &p.submitter,
        &fields(r#"{"bar": "Example", "baz": "WL"}"#)?,
    ).await?;
    assert_eq!(engaged.task.activity, "foo_activity");
    assert_eq!(platform.list_requests("sample").await?.len(), 1);

    let err = platform.create_activity(
        "sample",
        "Foo",
        Identifier::Id(engaged.task.id),
        &p.submitter,
        &fields(r#"{"bar": "Example", "baz": "WL"}"#)?,
    ).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::TransitionDenied(TransitionDenied::AlreadyEngaged(_)),
    ));

    let err = platform.create_activity(
        "sample",
        "Foo",
        Identifier::Id(engaged.task.id + 100),
        &p.submitter,
        &Fields::new(),
    ).await;
    assert!(matches!(
        err.unwrap_err(),
        PlatformError::CtrlError(CtrlError::UnknownTask(_)),
    ));
    Ok(())
}

#[async_std::test]
async fn test_platform_predicate_false() -> anyhow::Result<()> {
    let (platform, p) = create_sqlite_platform().await?;
    let initiated = platform.initiate_request(
        "sample",
        &p.submitter,
        &fields(r#"{"bar": "Example", "baz": "CR"}"#)?,
    ).await?;
    let task_id = initiated.task.id;
    assert_eq!(
        platform.candidates(task_id, &p.submitter).await?,
        Candidates::Eligible(Default::default()),
    );

    let err = platform.submit(task_id, &p.submitter, Some("corge_activity")).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::TransitionDenied(TransitionDenied::PredicateFalse { .. }),
    ));
    let tasks = platform.backend().list_tasks_for_request(initiated.request.id).await?;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::InProgress);

    let err = platform.save(
        task_id,
        &p.submitter,
        &fields(r#"{"bar": "lowercase", "baz": "CR", "qux": "grault"}"#)?,
    ).await;
    assert!(matches!(core_error(err.unwrap_err()), Error::Validation(_)));

    platform.save(
        task_id,
        &p.submitter,
        &fields(r#"{"bar": "Example", "baz": "CR", "qux": "grault"}"#)?,
    ).await?;
    assert!(platform.candidates(task_id, &p.submitter).await?.contains("corge_activity"));
    let advanced = platform.submit(task_id, &p.submitter, Some("corge_activity")).await?;
    assert!(advanced.successor.is_some());
    Ok(())
}

#[async_std::test]
async fn test_platform_rollback() -> anyhow::Result<()> {
    let (platform, p) = create_sqlite_platform().await?;
    let initiated = platform.initiate_request(
        "sample",
        &p.submitter,
        &fields(r#"{"bar": "Example", "baz": "CR", "qux": "grault"}"#)?,
    ).await?;
    let request_id = initiated.request.id;
    let task1 = initiated.task;

    let err = platform.rollback(task1.id, &p.submitter).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::RollbackNotPermitted(RollbackNotPermitted::InitialActivity(_)),
    ));

    let task2 = platform.submit(task1.id, &p.submitter, Some("corge_activity"))
        .await?
        .successor
        .expect("a successor task");
    let err = platform.rollback(task2.id, &p.submitter).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::AccessDenied(AccessDenied { operation: Operation::Rollback, .. }),
    ));
    assert_eq!(platform.backend().list_tasks_for_request(request_id).await?.len(), 2);

    let rolled_back = platform.rollback(task2.id, &p.reviewer).await?;
    assert_eq!(rolled_back.previous.id, task1.id);
    assert_eq!(rolled_back.previous.status, TaskStatus::RolledBack);
    assert_eq!(rolled_back.current.id, task2.id);
    assert_eq!(rolled_back.current.status, TaskStatus::RolledBack);
    let task3 = rolled_back.task;
    assert_eq!(task3.status, TaskStatus::NotStarted);
    assert_eq!(task3.assignee.as_str(), "Submitter");
    assert_eq!(task3.activity, "foo_activity");
    assert_eq!(rolled_back.record.task_id, Some(task3.id));
    assert_ne!(rolled_back.record.id, initiated.record.id);
    assert_eq!(rolled_back.record.fields, initiated.record.fields);

    let tasks = platform.backend().list_tasks_for_request(request_id).await?;
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks.active().map(|task| task.id), Some(task3.id));

    // the restored task carries its record; it is saved, not engaged
    let err = platform.assign_and_initiate(
        task3.id,
        &p.submitter,
        &fields(r#"{"bar": "Example", "baz": "WL"}"#)?,
    ).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::TransitionDenied(TransitionDenied::AlreadyEngaged(_)),
    ));
    let saved = platform.save(
        task3.id,
        &p.submitter,
        &fields(r#"{"bar": "Revised", "baz": "WL"}"#)?,
    ).await?;
    assert_eq!(saved.task.status, TaskStatus::InProgress);
    assert_eq!(saved.record.fields["bar"], "Revised");

    // the record of the rolled back task is left as it was
    let view = platform.view_task(task1.id, &p.submitter).await?;
    assert_eq!(view.record.map(|record| record.fields), Some(initiated.record.fields));
    assert_eq!(view.permitted, Operation::View);

    let err = platform.rollback(task3.id, &p.admin).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::RollbackNotPermitted(RollbackNotPermitted::InitialActivity(_)),
    ));
    let task4 = platform.submit(task3.id, &p.submitter, Some("corge_activity"))
        .await?
        .successor
        .expect("a successor task");
    assert_eq!(task4.activity, "corge_activity");
    Ok(())
}

#[async_std::test]
async fn test_platform_withdraw() -> anyhow::Result<()> {
    let (platform, p) = create_sqlite_platform().await?;
    let initiated = platform.initiate_request(
        "sample",
        &p.submitter,
        &fields(r#"{"bar": "Example", "baz": "WL"}"#)?,
    ).await?;
    let request_id = initiated.request.id;

    let err = platform.withdraw(request_id, &p.reviewer).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::AccessDenied(AccessDenied { operation: Operation::Update, .. }),
    ));
    let request = platform.withdraw(request_id, &p.submitter).await?;
    assert_eq!(request.status, RequestStatus::Withdrawn);

    let err = platform.submit(initiated.task.id, &p.submitter, Some("corge_activity")).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::TransitionDenied(TransitionDenied::RequestClosed(_)),
    ));
    let err = platform.withdraw(request_id, &p.admin).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::TransitionDenied(TransitionDenied::RequestClosed(_)),
    ));

    let other = platform.initiate_request(
        "sample",
        &p.clerk,
        &fields(r#"{"bar": "Example", "baz": "WL"}"#)?,
    ).await?;
    assert_eq!(
        platform.withdraw(other.request.id, &p.admin).await?.status,
        RequestStatus::Withdrawn,
    );
    assert_eq!(platform.list_requests("sample").await?.len(), 2);
    Ok(())
}

#[async_std::test]
async fn test_platform_concurrent_submit() -> anyhow::Result<()> {
    let (platform, p) = create_sqlite_platform().await?;
    let initiated = platform.initiate_request(
        "sample",
        &p.clerk,
        &fields(r#"{"bar": "Example", "baz": "WL"}"#)?,
    ).await?;
    let task_id = initiated.task.id;

    let (r1, r2) = futures::join!(
        platform.submit(task_id, &p.clerk, Some("corge_activity")),
        platform.submit(task_id, &p.submitter, Some("corge_activity")),
    );
    let (ok, err) = match (r1, r2) {
        (Ok(ok), Err(err)) | (Err(err), Ok(ok)) => (ok, err),
        (r1, r2) => panic!("expected exactly one success, got {r1:?} and {r2:?}"),
    };
    assert!(ok.successor.is_some());
    assert!(matches!(
        core_error(err),
        Error::TransitionDenied(TransitionDenied::NotActive(id)) if id == task_id,
    ));
    assert_eq!(
        platform.backend().list_tasks_for_request(initiated.request.id).await?.len(),
        2,
    );
    Ok(())
}

#[async_std::test]
async fn test_platform_concurrent_submit_shared_database() -> anyhow::Result<()> {
    let (_tempdir, first, second, p) = create_sqlite_file_platforms().await?;
    for _ in 0..20 {
        let initiated = first.initiate_request(
            "sample",
            &p.clerk,
            &fields(r#"{"bar": "Example", "baz": "WL"}"#)?,
        ).await?;
        let task_id = initiated.task.id;

        // only the database serializes these two
        let (r1, r2) = futures::join!(
            first.submit(task_id, &p.clerk, Some("corge_activity")),
            second.submit(task_id, &p.clerk, Some("corge_activity")),
        );
        let err = match (r1, r2) {
            (Ok(_), Err(err)) | (Err(err), Ok(_)) => err,
            (r1, r2) => panic!("expected exactly one success, got {r1:?} and {r2:?}"),
        };
        assert!(matches!(
            core_error(err),
            Error::TransitionDenied(TransitionDenied::NotActive(id)) if id == task_id,
        ));
        assert_eq!(
            second.backend().list_tasks_for_request(initiated.request.id).await?.len(),
            2,
        );
    }
    Ok(())
}

#[async_std::test]
async fn test_platform_view_task() -> anyhow::Result<()> {
    let (platform, p) = create_sqlite_platform().await?;
    let initiated = platform.initiate_request(
        "sample",
        &p.submitter,
        &fields(r#"{"bar": "Example", "baz": "WL"}"#)?,
    ).await?;
    let task1 = initiated.task;

    let view = platform.view_task(task1.id, &p.submitter).await?;
    assert_eq!(view.title, "Foo");
    assert!(!view.is_final);
    assert_eq!(view.candidates, Some(vec!["corge_activity".to_string()]));
    assert_eq!(view.permitted, Operation::View | Operation::Update);

    let err = platform.view_task(task1.id, &p.outsider).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::AccessDenied(AccessDenied { operation: Operation::View, .. }),
    ));
    let err = platform.request_history(initiated.request.id, &p.outsider).await;
    assert!(matches!(
        core_error(err.unwrap_err()),
        Error::AccessDenied(AccessDenied { operation: Operation::View, .. }),
    ));

    let task2 = platform.submit(task1.id, &p.submitter, Some("corge_activity"))
        .await?
        .successor
        .expect("a successor task");
    let view = platform.view_task(task2.id, &p.reviewer).await?;
    assert!(view.is_final);
    let flow = platform.registry().flow("sample")?;
    let task_ref = platform.backend().get_task_ref(task2.id).await?.expect("task 2");
    assert!(task_ref.is_final(flow)?);
    assert!(!platform.backend()
        .get_task_ref(task1.id)
        .await?
        .expect("task 1")
        .is_final(flow)?);
    assert!(view.record.is_none());
    assert_eq!(view.permitted, Operation::View | Operation::Create | Operation::Rollback);

    // the requester follows the request without holding the next role
    let view = platform.view_task(task2.id, &p.submitter).await?;
    assert_eq!(view.permitted, Operation::View);

    let view = platform.view_task(task2.id, &p.admin).await?;
    assert_eq!(view.permitted, Operation::View | Operation::Create | Operation::Rollback);

    let history = platform.request_history(initiated.request.id, &p.reviewer).await?;
    assert_eq!(history.tasks.map(|tasks| tasks.len()), Some(2));
    Ok(())
}

#[async_std::test]
async fn test_platform_access_check() -> anyhow::Result<()> {
    let (platform, p) = create_sqlite_platform().await?;
    let context = platform.initiate_context("sample")?;
    assert!(platform.access_check(Operation::Create, &p.submitter, &context));
    assert!(platform.access_check(Operation::Create, &p.admin, &context));
    assert!(!platform.access_check(Operation::Create, &p.reviewer, &context));
    assert!(platform.initiate_context("no_such_module").is_err());

    let initiated = platform.initiate_request(
        "sample",
        &p.submitter,
        &fields(r#"{"bar": "Example", "baz": "WL"}"#)?,
    ).await?;
    let context = platform.task_context(initiated.task.id).await?;
    assert!(context.is_active);
    assert!(!context.rollback_possible);
    assert_eq!(context.requester_id, Some(p.submitter.id));
    assert!(platform.access_check(Operation::Update, &p.submitter, &context));
    assert!(!platform.access_check(Operation::Update, &p.reviewer, &context));
    assert!(!platform.access_check(Operation::Rollback, &p.submitter, &context));
    assert!(!platform.access_check(Operation::View, &p.outsider, &context));

    let task2 = platform.submit(initiated.task.id, &p.submitter, Some("corge_activity"))
        .await?
        .successor
        .expect("a successor task");
    let context = platform.task_context(task2.id).await?;
    assert!(context.rollback_possible);
    assert!(platform.access_check(Operation::Rollback, &p.reviewer, &context));
    // the first task is history now
    let context = platform.task_context(initiated.task.id).await?;
    assert!(!context.is_active);
    assert!(!platform.access_check(Operation::Update, &p.submitter, &context));
    assert!(platform.access_check(Operation::View, &p.submitter, &context));
    Ok(())
}
