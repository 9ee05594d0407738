//! Per-thread context variables
//!
//! Values set here are rendered into the context column of every log line
//! written from the same thread (`[trace extra...]`). Worker threads start
//! with an empty context, so each task sets its own `trace` value.
//!
//! ```
//! use paladin_core::context;
//!
//! context::set_trace("trace-task1");
//! assert_eq!(context::get_var("trace").as_deref(), Some("trace-task1"));
//! assert_eq!(context::render(&["trace".to_string(), "user".to_string()]), "trace-task1 -");
//! ```

use paladin_core_types::schema::CONTEXT_TRACE;
use paladin_core_types::TraceId;
use std::cell::RefCell;
use std::collections::HashMap;

const MISSING: &str = "-";

thread_local! {
    static VARS: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

/// Set several context variables at once
pub fn set_vars<I, K, V>(vars: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    VARS.with(|cell| {
        let mut map = cell.borrow_mut();
        for (key, value) in vars {
            map.insert(key.into(), value.to_string());
        }
    });
}

/// Set a single context variable
pub fn set_var(key: impl Into<String>, value: impl ToString) {
    set_vars([(key, value)]);
}

/// Read a context variable of the current thread
pub fn get_var(key: &str) -> Option<String> {
    VARS.with(|cell| cell.borrow().get(key).cloned())
}

/// Remove a context variable, returning its previous value
pub fn remove_var(key: &str) -> Option<String> {
    VARS.with(|cell| cell.borrow_mut().remove(key))
}

/// Set the `trace` variable
pub fn set_trace(value: impl Into<TraceId>) {
    set_var(CONTEXT_TRACE, value.into());
}

/// Current `trace` value, if any
pub fn trace() -> Option<TraceId> {
    get_var(CONTEXT_TRACE).map(TraceId::from)
}

/// Drop every context variable of the current thread
pub fn clear() {
    VARS.with(|cell| cell.borrow_mut().clear());
}

/// Render the values of `keys` separated by spaces, `-` for unset keys
pub fn render(keys: &[String]) -> String {
    if keys.is_empty() {
        return MISSING.to_string();
    }
    VARS.with(|cell| {
        let map = cell.borrow();
        keys.iter()
            .map(|k| {
                map.get(k)
                    .filter(|v| !v.is_empty())
                    .map(String::as_str)
                    .unwrap_or(MISSING)
            })
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Sets a variable for the lifetime of the guard, restoring the previous
/// value when dropped
#[must_use = "the variable is restored as soon as the guard is dropped"]
pub struct ContextGuard {
    key: String,
    previous: Option<String>,
}

/// Scoped variant of [`set_var`]
pub fn scoped(key: impl Into<String>, value: impl ToString) -> ContextGuard {
    let key = key.into();
    let previous = get_var(&key);
    set_var(key.clone(), value);
    ContextGuard { key, previous }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(previous) => set_var(self.key.clone(), previous),
            None => {
                remove_var(&self.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_uses_dash_for_missing() {
        clear();
        assert_eq!(render(&keys(&["trace"])), "-");
        assert_eq!(render(&[]), "-");

        set_vars([("trace", "t1"), ("user", "alice")]);
        assert_eq!(render(&keys(&["trace", "user", "tenant"])), "t1 alice -");
    }

    #[test]
    fn test_vars_are_thread_local() {
        clear();
        set_trace("main");

        let from_worker = std::thread::spawn(|| {
            let before = trace();
            set_trace("worker");
            (before, trace())
        })
        .join()
        .unwrap();

        assert_eq!(from_worker.0, None);
        assert_eq!(from_worker.1, Some(TraceId::from("worker")));
        assert_eq!(trace(), Some(TraceId::from("main")));
    }

    #[test]
    fn test_scoped_restores_previous_value() {
        clear();
        set_var("name", "outer");
        {
            let _guard = scoped("name", "inner");
            assert_eq!(get_var("name").as_deref(), Some("inner"));
        }
        assert_eq!(get_var("name").as_deref(), Some("outer"));

        {
            let _guard = scoped("fresh", 1);
        }
        assert_eq!(get_var("fresh"), None);
    }
}
