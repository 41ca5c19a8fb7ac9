//! Unit tests for environment helpers.

use super::*;

#[test]
fn set_var_restores_absent_key() {
    const KEY: &str = "ACCRETE_TEST_HELPERS_RESTORE";
    let _clear = remove_var(KEY);
    {
        let _guard = set_var(KEY, "value");
        assert_eq!(env::var(KEY).as_deref(), Ok("value"));
    }
    assert!(env::var_os(KEY).is_none());
}

#[test]
fn stacked_guards_restore_in_reverse_order() {
    const KEY: &str = "ACCRETE_TEST_HELPERS_STACKED";
    let _clear = remove_var(KEY);
    let first = set_var(KEY, "one");
    let second = set_var(KEY, "two");
    assert_eq!(env::var(KEY).as_deref(), Ok("two"));
    drop(second);
    assert_eq!(env::var(KEY).as_deref(), Ok("one"));
    drop(first);
    assert!(env::var_os(KEY).is_none());
}

#[test]
fn scope_sets_and_removes_together() {
    const KEY: &str = "ACCRETE_TEST_HELPERS_SCOPED";
    let other = "ACCRETE_TEST_HELPERS_OTHER";
    let _clear = remove_var(KEY);
    let _outer = set_var(other, "present");
    {
        let _scope = EnvScope::with(&[(KEY, Some("scoped")), (other, None)]);
        assert_eq!(env::var(KEY).as_deref(), Ok("scoped"));
        assert!(env::var_os(other).is_none());
    }
    assert_eq!(env::var(other).as_deref(), Ok("present"));
    assert!(env::var_os(KEY).is_none());
}
