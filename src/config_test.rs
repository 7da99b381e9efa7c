use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_applies_defaults() {
    let cfg = AppConfig::from_lookup(lookup_from(&[
        ("SUPABASE_URL", "https://demo.supabase.co/"),
        ("SUPABASE_ANON_KEY", "anon"),
    ]))
    .unwrap();

    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.supabase.url, "https://demo.supabase.co");
    assert_eq!(cfg.supabase.anon_key, "anon");
    assert_eq!(
        cfg.supabase.timeouts,
        Timeouts {
            request: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    );
    assert_eq!(cfg.cache, CacheConfig::default());
    assert!(cfg.cookie_secure);
    assert_eq!(cfg.assets_dir, PathBuf::from(DEFAULT_ASSETS_DIR));
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = AppConfig::from_lookup(lookup_from(&[
        ("SUPABASE_URL", "http://localhost:54321"),
        ("SUPABASE_ANON_KEY", "anon"),
        ("PORT", "8080"),
        ("SUPABASE_REQUEST_TIMEOUT_SECS", "5"),
        ("SUPABASE_CONNECT_TIMEOUT_SECS", "2"),
        ("TASKS_STALE_SECS", "15"),
        ("TASKS_GC_SECS", "60"),
        ("COOKIE_SECURE", "yes"),
        ("ASSETS_DIR", "/srv/assets"),
    ]))
    .unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.supabase.timeouts.request, Duration::from_secs(5));
    assert_eq!(cfg.supabase.timeouts.connect, Duration::from_secs(2));
    assert_eq!(cfg.cache.stale_time, Duration::from_secs(15));
    assert_eq!(cfg.cache.gc_time, Duration::from_secs(60));
    assert!(cfg.cookie_secure);
    assert_eq!(cfg.assets_dir, PathBuf::from("/srv/assets"));
}

#[test]
fn cookie_secure_defaults_to_false_for_plain_http() {
    let cfg = AppConfig::from_lookup(lookup_from(&[
        ("SUPABASE_URL", "http://localhost:54321"),
        ("SUPABASE_ANON_KEY", "anon"),
    ]))
    .unwrap();
    assert!(!cfg.cookie_secure);
}

#[test]
fn missing_url_is_an_error() {
    let err = AppConfig::from_lookup(lookup_from(&[("SUPABASE_ANON_KEY", "anon")])).unwrap_err();
    assert_eq!(err, ConfigError::Missing("SUPABASE_URL"));
}

#[test]
fn blank_anon_key_counts_as_missing() {
    let err = AppConfig::from_lookup(lookup_from(&[
        ("SUPABASE_URL", "https://demo.supabase.co"),
        ("SUPABASE_ANON_KEY", "   "),
    ]))
    .unwrap_err();
    assert_eq!(err, ConfigError::Missing("SUPABASE_ANON_KEY"));
}

#[test]
fn url_without_scheme_is_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[
        ("SUPABASE_URL", "demo.supabase.co"),
        ("SUPABASE_ANON_KEY", "anon"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "SUPABASE_URL", .. }));
}

#[test]
fn bad_port_is_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[
        ("SUPABASE_URL", "https://demo.supabase.co"),
        ("SUPABASE_ANON_KEY", "anon"),
        ("PORT", "eighty"),
    ]))
    .unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: "PORT", value: "eighty".into() });
}

#[test]
fn parse_bool_accepts_common_spellings() {
    assert_eq!(parse_bool("ON"), Some(true));
    assert_eq!(parse_bool(" 0 "), Some(false));
    assert_eq!(parse_bool("maybe"), None);
}
