use super::*;
use crate::tasks::types::{Choice, SortDirection, TaskPriority, TaskSortField};

fn params(status: Option<&str>, priority: Option<&str>, sort: Option<&str>) -> FilterParams {
    FilterParams {
        status: status.map(str::to_owned),
        priority: priority.map(str::to_owned),
        sort: sort.map(str::to_owned),
        ..FilterParams::default()
    }
}

#[test]
fn list_state_reads_valid_filters() {
    let state = list_state(&params(Some("completed"), Some("urgent"), Some("title.asc")));
    assert_eq!(state.filters.status, Choice::Only(TaskStatus::Completed));
    assert_eq!(state.filters.priority, Choice::Only(TaskPriority::Urgent));
    assert_eq!(state.sort.field, TaskSortField::Title);
    assert_eq!(state.sort.direction, SortDirection::Asc);
}

#[test]
fn list_state_falls_back_on_unknown_values() {
    let state = list_state(&params(Some("archived"), None, None));
    assert_eq!(state, ListState::default());
}

#[test]
fn parse_id_accepts_uuid_only() {
    let id = Uuid::new_v4();
    assert_eq!(parse_id(Some(&id.to_string())), Some(id));
    assert_eq!(parse_id(Some(" not-an-id ")), None);
    assert_eq!(parse_id(None), None);
}

#[test]
fn back_to_list_keeps_filters() {
    let list = list_state(&params(Some("pending"), None, None));
    let response = back_to_list(&list, Notice::Deleted);
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/home/tasks?status=pending&notice=deleted");
}
