use std::sync::atomic::Ordering;
use std::time::Duration;

use super::*;
use crate::state::test_helpers::MemoryBackend;
use crate::tasks::types::{Choice, SortDirection, TaskPriority, TaskSortField};

fn service(backend: &Arc<MemoryBackend>, stale_secs: u64) -> TaskService {
    TaskService::new(
        Arc::clone(backend) as Arc<dyn TaskStore>,
        Arc::clone(backend) as Arc<dyn AuthGateway>,
        CacheConfig { stale_time: Duration::from_secs(stale_secs), gc_time: Duration::from_secs(300) },
    )
}

fn create_input(title: &str) -> CreateTaskInput {
    CreateTaskInput { title: title.into(), ..CreateTaskInput::default() }
}

// =============================================================================
// READS
// =============================================================================

#[tokio::test]
async fn list_only_returns_callers_tasks() {
    let backend = MemoryBackend::new();
    let (token, ada) = backend.sign_up("ada@example.com");
    let (_, bob) = backend.sign_up("bob@example.com");
    backend.seed(&ada, "Mine", TaskStatus::Pending, TaskPriority::Low);
    backend.seed(&bob, "Theirs", TaskStatus::Pending, TaskPriority::Low);

    let tasks = service(&backend, 0).list_tasks(&token, &TaskFilters::default(), TaskSort::default()).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Mine");
}

#[tokio::test]
async fn list_applies_filters() {
    let backend = MemoryBackend::new();
    let (token, ada) = backend.sign_up("ada@example.com");
    backend.seed(&ada, "Pay rent", TaskStatus::Pending, TaskPriority::Urgent);
    backend.seed(&ada, "Pay taxes", TaskStatus::Completed, TaskPriority::High);
    backend.seed(&ada, "Walk dog", TaskStatus::Pending, TaskPriority::Low);

    let filters = TaskFilters { status: Choice::Only(TaskStatus::Pending), search: "pay".into(), ..TaskFilters::default() };
    let tasks = service(&backend, 0).list_tasks(&token, &filters, TaskSort::default()).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Pay rent");
}

#[tokio::test]
async fn due_date_sort_puts_undated_tasks_last_ascending_and_first_descending() {
    let backend = MemoryBackend::new();
    let (token, _) = backend.sign_up("ada@example.com");
    let service = service(&backend, 0);
    let dated = CreateTaskInput { due_date: Some(time::macros::datetime!(2025-03-07 0:00 UTC)), ..create_input("Dated") };
    service.create_task(&token, create_input("Undated")).await.unwrap();
    service.create_task(&token, dated).await.unwrap();

    let titles = |tasks: Vec<Task>| tasks.into_iter().map(|t| t.title).collect::<Vec<_>>();
    let asc = TaskSort { field: TaskSortField::DueDate, direction: SortDirection::Asc };
    let tasks = service.list_tasks(&token, &TaskFilters::default(), asc).await.unwrap();
    assert_eq!(titles(tasks), ["Dated", "Undated"]);

    let desc = TaskSort { field: TaskSortField::DueDate, direction: SortDirection::Desc };
    let tasks = service.list_tasks(&token, &TaskFilters::default(), desc).await.unwrap();
    assert_eq!(titles(tasks), ["Undated", "Dated"]);
}

#[tokio::test]
async fn list_is_cached_within_stale_time() {
    let backend = MemoryBackend::new();
    let (token, _) = backend.sign_up("ada@example.com");
    let service = service(&backend, 60);

    service.list_tasks(&token, &TaskFilters::default(), TaskSort::default()).await.unwrap();
    service.list_tasks(&token, &TaskFilters::default(), TaskSort::default()).await.unwrap();
    assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn list_failure_is_a_retryable_backend_error() {
    let backend = MemoryBackend::new();
    let (token, _) = backend.sign_up("ada@example.com");
    backend.fail_reads.store(true, Ordering::SeqCst);

    let err = service(&backend, 0).list_tasks(&token, &TaskFilters::default(), TaskSort::default()).await.unwrap_err();
    assert!(matches!(err, TaskError::Backend(_)));
    assert!(err.retryable());
}

#[tokio::test]
async fn expired_session_maps_to_unauthenticated() {
    let backend = MemoryBackend::new();
    let token = AccessToken::new("expired");

    let err = service(&backend, 0).list_tasks(&token, &TaskFilters::default(), TaskSort::default()).await.unwrap_err();
    assert!(matches!(err, TaskError::Unauthenticated));
}

#[tokio::test]
async fn get_missing_task_is_not_found() {
    let backend = MemoryBackend::new();
    let (token, _) = backend.sign_up("ada@example.com");
    let id = Uuid::new_v4();

    let err = service(&backend, 0).get_task(&token, id).await.unwrap_err();
    assert!(matches!(err, TaskError::NotFound(missing) if missing == id));
    assert_eq!(err.error_code(), "E_TASK_NOT_FOUND");
}

#[tokio::test]
async fn get_hides_other_users_tasks() {
    let backend = MemoryBackend::new();
    let (token, _) = backend.sign_up("ada@example.com");
    let (_, bob) = backend.sign_up("bob@example.com");
    let theirs = backend.seed(&bob, "Secret", TaskStatus::Pending, TaskPriority::Low);

    let err = service(&backend, 0).get_task(&token, theirs.id).await.unwrap_err();
    assert!(matches!(err, TaskError::NotFound(_)));
}

// =============================================================================
// CREATE
// =============================================================================

#[tokio::test]
async fn create_sets_ownership_from_session() {
    let backend = MemoryBackend::new();
    let (token, ada) = backend.sign_up("ada@example.com");

    let task = service(&backend, 0).create_task(&token, create_input("Plan sprint")).await.unwrap();
    assert_eq!(task.user_id, ada.id);
    assert_eq!(task.account_id, ada.id);
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.priority, TaskPriority::Medium);
}

#[tokio::test]
async fn create_without_user_fails_with_message() {
    let backend = MemoryBackend::new();
    let err = service(&backend, 0)
        .create_task(&AccessToken::new("nobody"), create_input("Plan sprint"))
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::Unauthenticated));
    assert_eq!(err.to_string(), "User not authenticated");
    assert_eq!(backend.row_count(), 0);
}

#[tokio::test]
async fn create_rejects_invalid_input_before_any_write() {
    let backend = MemoryBackend::new();
    let (token, _) = backend.sign_up("ada@example.com");

    let err = service(&backend, 0).create_task(&token, create_input("")).await.unwrap_err();
    let TaskError::Validation(errors) = err else { panic!("expected validation error, got {err:?}") };
    assert_eq!(errors.message_for("title"), Some("Title is required"));
    assert_eq!(backend.row_count(), 0);
}

#[tokio::test]
async fn create_invalidates_cached_lists() {
    let backend = MemoryBackend::new();
    let (token, _) = backend.sign_up("ada@example.com");
    let service = service(&backend, 60);

    let before = service.list_tasks(&token, &TaskFilters::default(), TaskSort::default()).await.unwrap();
    service.create_task(&token, create_input("New one")).await.unwrap();
    let after = service.list_tasks(&token, &TaskFilters::default(), TaskSort::default()).await.unwrap();

    assert!(before.is_empty());
    assert_eq!(after.len(), 1);
    assert_eq!(backend.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_create_surfaces_backend_error() {
    let backend = MemoryBackend::new();
    let (token, _) = backend.sign_up("ada@example.com");
    backend.fail_writes.store(true, Ordering::SeqCst);

    let err = service(&backend, 0).create_task(&token, create_input("Plan sprint")).await.unwrap_err();
    assert!(matches!(err, TaskError::Backend(SupabaseError::Request(_))));
}

// =============================================================================
// UPDATE / TOGGLE / DELETE
// =============================================================================

#[tokio::test]
async fn update_invalidates_list_and_single_entry() {
    let backend = MemoryBackend::new();
    let (token, ada) = backend.sign_up("ada@example.com");
    let seeded = backend.seed(&ada, "Draft", TaskStatus::Pending, TaskPriority::Low);
    let service = service(&backend, 60);

    service.list_tasks(&token, &TaskFilters::default(), TaskSort::default()).await.unwrap();
    service.get_task(&token, seeded.id).await.unwrap();

    let input = UpdateTaskInput { title: Some("Final".into()), ..UpdateTaskInput::default() };
    service.update_task(&token, seeded.id, input).await.unwrap();

    let list = service.list_tasks(&token, &TaskFilters::default(), TaskSort::default()).await.unwrap();
    let single = service.get_task(&token, seeded.id).await.unwrap();
    assert_eq!(list[0].title, "Final");
    assert_eq!(single.title, "Final");
    assert_eq!(backend.list_calls.load(Ordering::SeqCst), 2);
    assert_eq!(backend.get_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn update_of_missing_task_is_not_found() {
    let backend = MemoryBackend::new();
    let (token, _) = backend.sign_up("ada@example.com");
    let input = UpdateTaskInput { priority: Some(TaskPriority::High), ..UpdateTaskInput::default() };

    let err = service(&backend, 0).update_task(&token, Uuid::new_v4(), input).await.unwrap_err();
    assert!(matches!(err, TaskError::NotFound(_)));
}

#[tokio::test]
async fn empty_update_returns_current_task_without_writing() {
    let backend = MemoryBackend::new();
    let (token, ada) = backend.sign_up("ada@example.com");
    let seeded = backend.seed(&ada, "Same", TaskStatus::Pending, TaskPriority::Low);

    let task = service(&backend, 0).update_task(&token, seeded.id, UpdateTaskInput::default()).await.unwrap();
    assert_eq!(task, seeded);
    assert!(backend.row(seeded.id).unwrap().updated_at.is_none());
}

#[tokio::test]
async fn toggle_completes_open_tasks_and_reopens_completed_ones() {
    let backend = MemoryBackend::new();
    let (token, ada) = backend.sign_up("ada@example.com");
    let open = backend.seed(&ada, "Open", TaskStatus::InProgress, TaskPriority::Low);
    let done = backend.seed(&ada, "Done", TaskStatus::Completed, TaskPriority::Low);
    let service = service(&backend, 0);

    let toggled = service.toggle_status(&token, open.id, open.status).await.unwrap();
    assert_eq!(toggled.status, TaskStatus::Completed);

    let toggled = service.toggle_status(&token, done.id, done.status).await.unwrap();
    assert_eq!(toggled.status, TaskStatus::Pending);
}

#[tokio::test]
async fn delete_removes_row_and_invalidates() {
    let backend = MemoryBackend::new();
    let (token, ada) = backend.sign_up("ada@example.com");
    let seeded = backend.seed(&ada, "Gone soon", TaskStatus::Pending, TaskPriority::Low);
    let service = service(&backend, 60);

    assert_eq!(service.list_tasks(&token, &TaskFilters::default(), TaskSort::default()).await.unwrap().len(), 1);
    service.delete_task(&token, seeded.id).await.unwrap();
    assert!(service.list_tasks(&token, &TaskFilters::default(), TaskSort::default()).await.unwrap().is_empty());
    assert!(backend.row(seeded.id).is_none());
}

#[tokio::test]
async fn sessions_do_not_share_cache_entries() {
    let backend = MemoryBackend::new();
    let (ada_token, ada) = backend.sign_up("ada@example.com");
    let (bob_token, _) = backend.sign_up("bob@example.com");
    backend.seed(&ada, "Ada's", TaskStatus::Pending, TaskPriority::Low);
    let service = service(&backend, 60);

    let ada_tasks = service.list_tasks(&ada_token, &TaskFilters::default(), TaskSort::default()).await.unwrap();
    let bob_tasks = service.list_tasks(&bob_token, &TaskFilters::default(), TaskSort::default()).await.unwrap();
    assert_eq!(ada_tasks.len(), 1);
    assert!(bob_tasks.is_empty());
}
