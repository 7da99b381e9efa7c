use super::*;

#[test]
fn safe_next_keeps_local_paths() {
    assert_eq!(safe_next(Some("/home/tasks?status=pending")), "/home/tasks?status=pending");
}

#[test]
fn safe_next_rejects_other_targets() {
    assert_eq!(safe_next(None), TASKS_PATH);
    assert_eq!(safe_next(Some("https://evil.example")), TASKS_PATH);
    assert_eq!(safe_next(Some("//evil.example/path")), TASKS_PATH);
    assert_eq!(safe_next(Some("/\\evil.example/path")), TASKS_PATH);
    assert_eq!(safe_next(Some("/\t/evil.example")), TASKS_PATH);
    assert_eq!(safe_next(Some("/auth/sign-in?next=/home/tasks")), TASKS_PATH);
}

#[test]
fn credential_errors_show_upstream_message() {
    let err = SupabaseError::Api { status: 400, code: Some("invalid_credentials".into()), message: "Invalid login credentials".into() };
    assert_eq!(sign_in_failure_message(&err), "Invalid login credentials");
}

#[test]
fn outages_show_generic_message() {
    let err = SupabaseError::Request("connection refused".into());
    assert_eq!(sign_in_failure_message(&err), "Sign in is unavailable right now. Please try again.");
}
