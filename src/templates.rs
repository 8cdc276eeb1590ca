//! Template loading and rendering using Tera.
//!
//! The text views of the task list are rendered from templates. Each one is
//! embedded in the binary and can be overridden by a file of the same name in
//! the templates directory (`~/.tasklist/templates/` by default).

use crate::error::{Error, Result};
use crate::view::{ListView, StatsView};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tera::{Context, Tera};

/// Template for `list`.
pub const LIST_TEMPLATE: &str = "list.tera";

/// Template for `stats`.
pub const STATS_TEMPLATE: &str = "stats.tera";

/// Embedded default templates for fallback when files don't exist.
static EMBEDDED_TEMPLATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(LIST_TEMPLATE, include_str!("../templates/list.tera"));
    m.insert(STATS_TEMPLATE, include_str!("../templates/stats.tera"));
    m
});

/// Global template engine with caching.
static TERA: Lazy<RwLock<Option<Tera>>> = Lazy::new(|| RwLock::new(None));

/// Initialize the template engine with templates from the specified directory.
///
/// Templates missing from the directory (or all of them, if the directory
/// doesn't exist or none is given) come from the embedded defaults.
///
/// # Errors
///
/// Returns an error if the templates directory exists but contains invalid
/// templates.
pub fn init_templates(templates_dir: Option<&Path>) -> Result<()> {
    let mut tera = Tera::default();

    if let Some(dir) = templates_dir.filter(|dir| dir.exists()) {
        let glob_pattern = format!("{}/**/*.tera", dir.display());
        tera = Tera::new(&glob_pattern).map_err(|e| {
            Error::Template(format!("Failed to load templates from {}: {e}", dir.display()))
        })?;
    }

    for (name, content) in EMBEDDED_TEMPLATES.iter() {
        if tera.get_template(name).is_err() {
            tera.add_raw_template(name, content)
                .map_err(|e| Error::Template(format!("Invalid embedded template {name}: {e}")))?;
        }
    }

    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = Some(tera);

    Ok(())
}

/// Render a template with the given context.
///
/// Falls back to the embedded templates if [`init_templates`] was never
/// called.
///
/// # Errors
///
/// Returns an error if the template doesn't exist or rendering fails.
pub fn render(name: &str, context: &Context) -> Result<String> {
    let needs_init = TERA.read().map_err(|e| Error::Template(e.to_string()))?.is_none();

    if needs_init {
        init_templates(None)?;
    }

    let guard = TERA.read().map_err(|e| Error::Template(e.to_string()))?;
    let tera = guard.as_ref().ok_or_else(|| Error::Template("Templates not initialized".into()))?;
    let rendered = tera
        .render(name, context)
        .map_err(|e| Error::Template(format!("Failed to render template {name}: {e}")))?;
    drop(guard);

    Ok(rendered)
}

/// Render the task list.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn render_list(view: &ListView) -> Result<String> {
    let mut context = Context::new();
    context.insert("view", view);
    render(LIST_TEMPLATE, &context)
}

/// Render the statistics.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn render_stats(view: &StatsView) -> Result<String> {
    let mut context = Context::new();
    context.insert("view", view);
    render(STATS_TEMPLATE, &context)
}

/// Reset the template cache, forcing re-initialization on next use.
///
/// # Errors
///
/// Returns an error if the write lock cannot be acquired.
pub fn reset_cache() -> Result<()> {
    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = None;
    Ok(())
}

/// Get the list of all embedded template names.
#[must_use]
pub fn embedded_template_names() -> Vec<&'static str> {
    EMBEDDED_TEMPLATES.keys().copied().collect()
}

/// Verify all embedded templates render with sample data.
///
/// # Errors
///
/// Returns an error if any template fails to render.
pub fn verify_all_templates() -> Result<()> {
    reset_cache()?;
    init_templates(None)?;

    let (list, stats) = sample_views();
    render_list(&list)?;
    render_stats(&stats)?;

    let empty =
        crate::view::build_view(&[], &list.stats, list.filter, list.sort, chrono::Utc::now());
    render_list(&empty)?;

    Ok(())
}

/// Views over a small list covering every optional field.
fn sample_views() -> (ListView, StatsView) {
    use crate::tasks::query::compute_stats;
    use crate::tasks::{FilterMode, Priority, SortMode, Task};
    use chrono::{Duration, Utc};

    let now = Utc::now();
    let tasks = vec![
        Task {
            id: "buy-milk-0000abcd".into(),
            text: "Buy milk".into(),
            priority: Priority::High,
            completed: true,
            created_at: now - Duration::hours(3),
            completed_at: Some(now - Duration::hours(1)),
            updated_at: Some(now - Duration::hours(2)),
        },
        Task {
            id: "call-mom-0000abce".into(),
            text: "Call mom".into(),
            priority: Priority::Low,
            completed: false,
            created_at: now - Duration::days(10),
            completed_at: None,
            updated_at: None,
        },
    ];
    let stats = compute_stats(&tasks);
    (
        crate::view::build_view(&tasks, &stats, FilterMode::All, SortMode::Newest, now),
        crate::view::build_stats_view(&stats),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::query::compute_stats;
    use crate::tasks::{FilterMode, Priority, SortMode};
    use crate::testing::{completed_task, fixed_time, task};
    use crate::view::{build_stats_view, build_view};
    use std::fs;
    use tempfile::TempDir;

    fn list_view() -> ListView {
        let tasks = vec![
            task("buy-milk-1", "Buy milk", Priority::High, "2024-01-01T10:00:00Z"),
            completed_task("call-mom-2", "Call mom", Priority::Low, "2024-01-01T08:00:00Z"),
        ];
        let stats = compute_stats(&tasks);
        build_view(
            &tasks,
            &stats,
            FilterMode::All,
            SortMode::Newest,
            fixed_time("2024-01-01T12:00:00Z"),
        )
    }

    #[test]
    #[serial_test::serial]
    fn test_render_list() {
        reset_cache().unwrap();
        init_templates(None).unwrap();

        let out = render_list(&list_view()).unwrap();
        assert!(out.contains("[H] [ ] Buy milk"), "got: {out}");
        assert!(out.contains("[L] [x] Call mom"), "got: {out}");
        assert!(out.contains("buy-milk-1 | In Progress | created 2h ago"), "got: {out}");
        assert!(out.contains("completed 2024-01-01 09:00"), "got: {out}");
        assert!(out.contains("1 pending, 1 completed, 50% Complete"), "got: {out}");
    }

    #[test]
    #[serial_test::serial]
    fn test_render_empty_list() {
        reset_cache().unwrap();
        init_templates(None).unwrap();

        let stats = compute_stats(&[]);
        let now = fixed_time("2024-01-01T00:00:00Z");
        let view = build_view(&[], &stats, FilterMode::Pending, SortMode::Newest, now);
        let out = render_list(&view).unwrap();
        assert!(out.contains("No tasks to show."));
        assert!(out.contains("0% Complete"));
    }

    #[test]
    #[serial_test::serial]
    fn test_render_stats() {
        reset_cache().unwrap();
        init_templates(None).unwrap();

        let view = build_stats_view(&list_view().stats);
        let out = render_stats(&view).unwrap();
        assert!(out.contains("Total:     2"));
        assert!(out.contains("High: 1 (50%)"));
        assert!(out.contains("Medium: 0 (0%)"));
        assert!(out.contains("Low: 1 (50%)"));
    }

    #[test]
    #[serial_test::serial]
    fn test_filesystem_templates_override_embedded() {
        reset_cache().unwrap();

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LIST_TEMPLATE), "{{ view.rows | length }} tasks").unwrap();
        init_templates(Some(dir.path())).unwrap();

        assert_eq!(render_list(&list_view()).unwrap(), "2 tasks");
        // Stats still comes from the embedded default
        let out = render_stats(&build_stats_view(&list_view().stats)).unwrap();
        assert!(out.contains("By priority:"));

        reset_cache().unwrap();
    }

    #[test]
    #[serial_test::serial]
    fn test_missing_dir_uses_embedded() {
        reset_cache().unwrap();
        init_templates(Some(Path::new("/nonexistent"))).unwrap();

        assert!(render_list(&list_view()).unwrap().contains("Buy milk"));
    }

    #[test]
    #[serial_test::serial]
    fn test_lazy_init() {
        reset_cache().unwrap();
        assert!(render_list(&list_view()).unwrap().contains("Call mom"));
    }

    #[test]
    #[serial_test::serial]
    fn test_render_missing_template_fails() {
        reset_cache().unwrap();
        init_templates(None).unwrap();

        assert!(render("nonexistent.tera", &Context::new()).is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_init_with_invalid_templates_fails() {
        reset_cache().unwrap();

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.tera"), "{% if foo %}unclosed if tag without endif")
            .unwrap();

        let err = init_templates(Some(dir.path())).unwrap_err().to_string();
        assert!(err.contains("Failed to load templates"), "Error was: {err}");
    }

    #[test]
    #[serial_test::serial]
    fn test_all_embedded_templates_render() {
        verify_all_templates().unwrap();
    }

    #[test]
    fn test_embedded_template_names() {
        let mut names = embedded_template_names();
        names.sort_unstable();
        assert_eq!(names, vec![LIST_TEMPLATE, STATS_TEMPLATE]);
    }
}
