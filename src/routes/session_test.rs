use axum::http::Request;

use super::*;

fn parts(headers: &[(&str, &str)]) -> Parts {
    let mut builder = Request::builder().uri("/home/tasks");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(()).unwrap().into_parts().0
}

#[test]
fn bearer_header_is_read() {
    let parts = parts(&[("authorization", "Bearer abc.def")]);
    assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def"));
}

#[test]
fn non_bearer_authorization_is_ignored() {
    let parts = parts(&[("authorization", "Basic Zm9vOmJhcg==")]);
    assert_eq!(bearer_token(&parts), None);
}

#[test]
fn session_cookie_is_read() {
    let parts = parts(&[("cookie", "theme=dark; sb-access-token=jwt-1")]);
    assert_eq!(cookie_token(&parts).as_deref(), Some("jwt-1"));
}

#[test]
fn empty_session_cookie_counts_as_missing() {
    let parts = parts(&[("cookie", "sb-access-token=")]);
    assert_eq!(cookie_token(&parts), None);
}

#[test]
fn session_cookie_is_http_only_and_scoped_to_root() {
    let cookie = session_cookie("jwt".into(), 3600, true);
    assert_eq!(cookie.name(), COOKIE_NAME);
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(time::Duration::hours(1)));
}

#[test]
fn clearing_cookie_expires_it() {
    let cookie = clear_session_cookie(false);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
}

#[test]
fn sign_in_redirect_encodes_return_path() {
    let response = sign_in_redirect("/home/tasks?status=pending", false);
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/sign-in?next=%2Fhome%2Ftasks%3Fstatus%3Dpending"
    );
    assert!(response.headers().get(header::SET_COOKIE).is_some());
}
