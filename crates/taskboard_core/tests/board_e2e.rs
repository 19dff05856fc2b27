use taskboard_core::{
    board_of, comments_of, tasks_of, BoardService, MemoryGateway, MemoryIdentityStore,
};

#[tokio::test]
async fn register_create_and_toggle_walk_the_buckets() {
    let mut service = BoardService::new(MemoryGateway::new(), MemoryIdentityStore::new());
    service.init().await.unwrap();

    let user_id = service.register_user("Tanaka", "t@x.com").await.unwrap();
    assert_eq!(service.current_user().map(|user| user.id), Some(user_id));

    let task_id = service.create_task("buy milk").await.unwrap();

    let view = board_of(service.snapshot(), user_id);
    assert_eq!(view.incomplete.len(), 1);
    assert_eq!(view.incomplete[0].id, task_id);
    assert!(!view.incomplete[0].completed);
    assert!(view.complete.is_empty());

    service.toggle_task(task_id).await.unwrap();

    let view = board_of(service.snapshot(), user_id);
    assert!(view.incomplete.is_empty());
    assert_eq!(view.complete.len(), 1);
    assert_eq!(view.complete[0].id, task_id);
}

#[tokio::test]
async fn task_visibility_is_scoped_to_the_owner() {
    let mut service = BoardService::new(MemoryGateway::new(), MemoryIdentityStore::new());
    service.init().await.unwrap();

    let first = service.register_user("Tanaka", "t@x.com").await.unwrap();
    let tanaka_task = service.create_task("tanaka's task").await.unwrap();

    // Registration binds the newest user, so this switches the session.
    let second = service.register_user("Suzuki", "s@x.com").await.unwrap();
    let suzuki_task = service.create_task("suzuki's task").await.unwrap();

    let tanaka_tasks = tasks_of(service.snapshot(), first);
    assert_eq!(tanaka_tasks.len(), 1);
    assert_eq!(tanaka_tasks[0].id, tanaka_task);

    let suzuki_tasks = tasks_of(service.snapshot(), second);
    assert_eq!(suzuki_tasks.len(), 1);
    assert_eq!(suzuki_tasks[0].id, suzuki_task);
}

#[tokio::test]
async fn any_authenticated_user_can_comment_on_a_visible_task() {
    let mut service = BoardService::new(MemoryGateway::new(), MemoryIdentityStore::new());
    service.init().await.unwrap();

    service.register_user("Tanaka", "t@x.com").await.unwrap();
    let task_id = service.create_task("shared work").await.unwrap();

    service.register_user("Suzuki", "s@x.com").await.unwrap();
    service.create_comment(task_id, "picking this up").await.unwrap();

    let thread = comments_of(service.snapshot(), task_id);
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].user_name, "Suzuki");
}

#[tokio::test]
async fn comment_author_name_stays_a_creation_time_snapshot() {
    let mut service = BoardService::new(MemoryGateway::new(), MemoryIdentityStore::new());
    service.init().await.unwrap();

    service.register_user("Tanaka", "t@x.com").await.unwrap();
    let task_id = service.create_task("rename later").await.unwrap();
    service.create_comment(task_id, "first").await.unwrap();

    // A later registration under a new name must not rewrite history.
    service.register_user("Tanaka (away)", "t2@x.com").await.unwrap();
    service.create_comment(task_id, "second").await.unwrap();

    let thread = comments_of(service.snapshot(), task_id);
    assert_eq!(thread[0].user_name, "Tanaka");
    assert_eq!(thread[1].user_name, "Tanaka (away)");
}

#[tokio::test]
async fn deleting_a_task_removes_its_thread_from_every_view() {
    let mut service = BoardService::new(MemoryGateway::new(), MemoryIdentityStore::new());
    service.init().await.unwrap();

    let user_id = service.register_user("Tanaka", "t@x.com").await.unwrap();
    let task_id = service.create_task("short lived").await.unwrap();
    service.create_comment(task_id, "soon gone").await.unwrap();

    service.delete_task(task_id).await.unwrap();

    assert!(tasks_of(service.snapshot(), user_id).is_empty());
    assert!(comments_of(service.snapshot(), task_id).is_empty());
    assert!(service.snapshot().verify_references().is_ok());
}
