//! The task store: the task list, its persistence and its derived views.

use crate::error::{Error, Result};
use crate::event_log::EventLog;
use crate::tasks::id::generate_unique_id;
use crate::tasks::models::{FilterMode, Priority, SortMode, Stats, Task};
use crate::tasks::query::{compute_stats, filter_and_sort};
use crate::tasks::snapshot;
use crate::traits::{Clock, StorageSlot, SystemClock};

/// Owns the task list and mirrors it to a storage slot.
///
/// Every mutation changes the in-memory list first and then saves the whole
/// list. If the save fails the change is kept and [`Error::Persistence`] is
/// returned. Operations that are rejected ([`Error::Validation`],
/// [`Error::NotFound`], [`Error::InvalidFormat`]) change nothing.
///
/// The active filter and sort only affect [`TaskStore::query`] and are never
/// persisted.
pub struct TaskStore<S: StorageSlot> {
    tasks: Vec<Task>,
    filter: FilterMode,
    sort: SortMode,
    slot: S,
    clock: Box<dyn Clock>,
    event_log: Option<EventLog>,
}

impl<S: StorageSlot> std::fmt::Debug for TaskStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks.len())
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .finish_non_exhaustive()
    }
}

impl<S: StorageSlot> TaskStore<S> {
    /// Open a store over `slot`, loading whatever it holds.
    ///
    /// A missing slot gives an empty list. An unreadable or corrupt slot also
    /// gives an empty list; the problem is printed as a warning and otherwise
    /// ignored.
    pub fn open(slot: S) -> Self {
        let tasks = load_tasks(&slot);
        Self {
            tasks,
            filter: FilterMode::default(),
            sort: SortMode::default(),
            slot,
            clock: Box::new(SystemClock),
            event_log: None,
        }
    }

    /// Use `clock` for all timestamps set from now on.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Record every mutation to `log`.
    #[must_use]
    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.event_log = Some(log);
        self
    }

    /// The storage slot.
    pub const fn slot(&self) -> &S {
        &self.slot
    }

    /// Mutable access to the storage slot.
    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    // Mutations

    /// Add a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `text` is empty after trimming, or
    /// [`Error::Persistence`] if the task was added but could not be saved.
    pub fn add(&mut self, text: &str, priority: Priority) -> Result<Task> {
        let text = non_empty_text(text)?;
        let id = generate_unique_id(text, |candidate| self.contains(candidate));

        let task = Task {
            id,
            text: text.to_string(),
            priority,
            completed: false,
            created_at: self.clock.now(),
            completed_at: None,
            updated_at: None,
        };
        self.tasks.push(task.clone());

        self.log("add", Some(&task.id), Some(&task.text));
        self.persist()?;
        Ok(task)
    }

    /// Flip a task between pending and completed.
    ///
    /// Completing sets `completed_at` to now; reopening clears it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, or
    /// [`Error::Persistence`] if the change could not be saved.
    pub fn toggle_complete(&mut self, id: &str) -> Result<Task> {
        let now = self.clock.now();
        let task = self.find_mut(id)?;
        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(now);
        let task = task.clone();

        let details = if task.completed { "completed" } else { "reopened" };
        self.log("toggle_complete", Some(id), Some(details));
        self.persist()?;
        Ok(task)
    }

    /// Replace a task's text and priority.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `new_text` is empty after trimming,
    /// [`Error::NotFound`] for an unknown id, or [`Error::Persistence`] if
    /// the change could not be saved.
    pub fn edit(&mut self, id: &str, new_text: &str, new_priority: Priority) -> Result<Task> {
        let new_text = non_empty_text(new_text)?;
        let now = self.clock.now();
        let task = self.find_mut(id)?;
        task.text = new_text.to_string();
        task.priority = new_priority;
        task.updated_at = Some(now);
        let task = task.clone();

        self.log("edit", Some(id), Some(&task.text));
        self.persist()?;
        Ok(task)
    }

    /// Remove a task, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, or
    /// [`Error::Persistence`] if the removal could not be saved.
    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let task = self.tasks.remove(index);

        self.log("delete", Some(id), Some(&task.text));
        self.persist()?;
        Ok(task)
    }

    /// Remove every completed task and return how many were removed.
    ///
    /// Nothing is saved when there was nothing to remove.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the removal could not be saved.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();

        if removed > 0 {
            self.log("clear_completed", None, Some(&format!("removed {removed}")));
            self.persist()?;
        }
        Ok(removed)
    }

    // View configuration

    /// Set the active filter.
    pub fn set_filter(&mut self, mode: FilterMode) {
        self.filter = mode;
    }

    /// Set the active sort order.
    pub fn set_sort(&mut self, mode: SortMode) {
        self.sort = mode;
    }

    /// The active filter.
    pub const fn filter(&self) -> FilterMode {
        self.filter
    }

    /// The active sort order.
    pub const fn sort(&self) -> SortMode {
        self.sort
    }

    // Queries

    /// The tasks passing the active filter, in the active sort order.
    #[must_use]
    pub fn query(&self) -> Vec<Task> {
        filter_and_sort(&self.tasks, self.filter, self.sort)
    }

    /// Counts over the whole list, regardless of the active filter.
    #[must_use]
    pub fn stats(&self) -> Stats {
        compute_stats(&self.tasks)
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Whether a task with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All tasks in storage order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // Import / export

    /// The whole list serialized for saving elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_snapshot(&self) -> Result<String> {
        snapshot::serialize(&self.tasks)
    }

    /// Replace the whole list with the tasks in `data`.
    ///
    /// Returns the number of imported tasks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] without touching the list if `data`
    /// is not a valid task list, or [`Error::Persistence`] if the new list
    /// could not be saved.
    pub fn import_snapshot(&mut self, data: &str) -> Result<usize> {
        let tasks = snapshot::parse(data)?;
        let count = tasks.len();
        self.tasks = tasks;

        self.log("import", None, Some(&format!("imported {count}")));
        self.persist()?;
        Ok(count)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id).ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn persist(&mut self) -> Result<()> {
        let data = snapshot::serialize(&self.tasks).map_err(Error::persistence)?;
        self.slot.save(&data).map_err(Error::persistence)
    }

    fn log(&self, operation: &str, task_id: Option<&str>, details: Option<&str>) {
        if let Some(log) = &self.event_log {
            log.record(operation, task_id, details);
        }
    }
}

/// Load the task list held by `slot`, falling back to an empty list.
pub fn load_tasks(slot: &impl StorageSlot) -> Vec<Task> {
    let data = match slot.load() {
        Ok(Some(data)) => data,
        Ok(None) => return Vec::new(),
        Err(e) => {
            eprintln!("Warning: Could not read saved tasks: {e}");
            return Vec::new();
        }
    };

    match snapshot::parse(&data) {
        Ok(tasks) => tasks,
        Err(e) => {
            eprintln!("Warning: Ignoring corrupt saved tasks: {e}");
            Vec::new()
        }
    }
}

fn non_empty_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("task text must not be empty".to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlot;
    use crate::tasks::id::{disable_deterministic_ids, enable_deterministic_ids};
    use crate::testing::{MockClock, MockStorageSlot};
    use chrono::Duration;

    fn create_test_store() -> (MockClock, TaskStore<MemorySlot>) {
        let clock = MockClock::at_epoch();
        let store = TaskStore::open(MemorySlot::new()).with_clock(clock.clone());
        (clock, store)
    }

    #[test]
    fn test_add_task() {
        enable_deterministic_ids();
        let (clock, mut store) = create_test_store();

        let task = store.add("  Buy milk  ", Priority::Low).unwrap();
        assert_eq!(task.id, "buy-milk-00000000");
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert!(task.updated_at.is_none());
        assert_eq!(task.created_at, clock.now());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&task.id), Some(&task));
        assert_eq!(store.slot().saves(), 1);

        disable_deterministic_ids();
    }

    #[test]
    fn test_add_empty_text_is_rejected() {
        let (_clock, mut store) = create_test_store();

        assert!(matches!(store.add("", Priority::Medium), Err(Error::Validation(_))));
        assert!(matches!(store.add("   ", Priority::High), Err(Error::Validation(_))));

        assert!(store.is_empty());
        assert_eq!(store.slot().saves(), 0);
    }

    #[test]
    fn test_add_generates_unique_ids() {
        let (_clock, mut store) = create_test_store();
        for _ in 0..50 {
            store.add("Same text", Priority::Medium).unwrap();
        }
        let mut ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_toggle_complete_sets_and_clears_completed_at() {
        let (clock, mut store) = create_test_store();
        let task = store.add("Walk dog", Priority::Medium).unwrap();

        clock.advance(Duration::minutes(5));
        let done = store.toggle_complete(&task.id).unwrap();
        assert!(done.completed);
        assert_eq!(done.completed_at, Some(clock.now()));

        let reopened = store.toggle_complete(&task.id).unwrap();
        assert!(!reopened.completed);
        assert!(reopened.completed_at.is_none());

        // Toggling twice restores the original task
        assert_eq!(reopened, task);
        assert_eq!(store.slot().saves(), 3);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let (_clock, mut store) = create_test_store();
        store.add("Walk dog", Priority::Medium).unwrap();
        let before = store.tasks().to_vec();

        let err = store.toggle_complete("nonexistent").unwrap_err();
        assert!(matches!(err, Error::NotFound(ref id) if id == "nonexistent"));
        assert_eq!(store.tasks(), before.as_slice());
        assert_eq!(store.slot().saves(), 1);
    }

    #[test]
    fn test_edit_task() {
        let (clock, mut store) = create_test_store();
        let task = store.add("Original", Priority::Medium).unwrap();

        clock.advance(Duration::hours(1));
        let edited = store.edit(&task.id, "  Updated ", Priority::High).unwrap();
        assert_eq!(edited.id, task.id);
        assert_eq!(edited.text, "Updated");
        assert_eq!(edited.priority, Priority::High);
        assert_eq!(edited.updated_at, Some(clock.now()));
        assert_eq!(edited.created_at, task.created_at);
    }

    #[test]
    fn test_edit_rejections_change_nothing() {
        let (_clock, mut store) = create_test_store();
        let task = store.add("Original", Priority::Medium).unwrap();

        assert!(matches!(store.edit(&task.id, "  ", Priority::High), Err(Error::Validation(_))));
        assert!(matches!(store.edit("missing", "New", Priority::High), Err(Error::NotFound(_))));

        assert_eq!(store.get(&task.id), Some(&task));
        assert_eq!(store.slot().saves(), 1);
    }

    #[test]
    fn test_delete_task() {
        let (_clock, mut store) = create_test_store();
        let task = store.add("To delete", Priority::Medium).unwrap();

        let removed = store.delete(&task.id).unwrap();
        assert_eq!(removed, task);
        assert!(store.is_empty());

        // Gone for good
        assert!(matches!(store.delete(&task.id), Err(Error::NotFound(_))));
        assert!(matches!(store.toggle_complete(&task.id), Err(Error::NotFound(_))));
        assert_eq!(store.slot().saves(), 2);
    }

    #[test]
    fn test_clear_completed() {
        let (_clock, mut store) = create_test_store();
        let a = store.add("A", Priority::Medium).unwrap();
        let b = store.add("B", Priority::Medium).unwrap();
        let c = store.add("C", Priority::Medium).unwrap();
        store.toggle_complete(&a.id).unwrap();
        store.toggle_complete(&c.id).unwrap();
        let saves = store.slot().saves();

        assert_eq!(store.clear_completed().unwrap(), 2);
        assert_eq!(store.len(), 1);
        assert!(store.contains(&b.id));
        assert_eq!(store.slot().saves(), saves + 1);

        // Nothing left to clear, nothing saved
        assert_eq!(store.clear_completed().unwrap(), 0);
        assert_eq!(store.slot().saves(), saves + 1);
    }

    #[test]
    fn test_query_uses_filter_and_sort() {
        let (clock, mut store) = create_test_store();
        let a = store.add("banana", Priority::Low).unwrap();
        clock.advance(Duration::seconds(1));
        let b = store.add("Apple", Priority::High).unwrap();
        clock.advance(Duration::seconds(1));
        let c = store.add("cherry", Priority::Medium).unwrap();
        store.toggle_complete(&b.id).unwrap();

        assert_eq!(store.filter(), FilterMode::All);
        assert_eq!(store.sort(), SortMode::Newest);
        let ids: Vec<String> = store.query().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![c.id.clone(), b.id.clone(), a.id.clone()]);

        store.set_filter(FilterMode::Pending);
        store.set_sort(SortMode::Alphabetical);
        let ids: Vec<String> = store.query().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id.clone(), c.id.clone()]);

        store.set_filter(FilterMode::Completed);
        let ids: Vec<String> = store.query().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![b.id]);
    }

    #[test]
    fn test_view_configuration_is_not_persisted() {
        let (_clock, mut store) = create_test_store();
        store.set_filter(FilterMode::Completed);
        store.set_sort(SortMode::Priority);
        assert_eq!(store.slot().saves(), 0);
    }

    #[test]
    fn test_stats_ignore_filter() {
        let (_clock, mut store) = create_test_store();
        let task = store.add("Buy milk", Priority::Low).unwrap();
        store.toggle_complete(&task.id).unwrap();
        store.set_filter(FilterMode::Pending);

        let stats = store.stats();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.completion_rate, 100);
        assert_eq!(stats.priority_counts.low, 1);
        assert!(store.query().is_empty());
    }

    #[test]
    fn test_export_import_round_trip() {
        let (_clock, mut store) = create_test_store();
        let a = store.add("One", Priority::High).unwrap();
        store.add("Two", Priority::Low).unwrap();
        store.toggle_complete(&a.id).unwrap();
        let exported = store.export_snapshot().unwrap();

        let (_clock, mut other) = create_test_store();
        other.add("Will be replaced", Priority::Medium).unwrap();
        assert_eq!(other.import_snapshot(&exported).unwrap(), 2);
        assert_eq!(other.tasks(), store.tasks());
        assert_eq!(other.slot().data(), Some(exported.as_str()));
    }

    #[test]
    fn test_import_invalid_format_changes_nothing() {
        let (_clock, mut store) = create_test_store();
        store.add("Keep me", Priority::Medium).unwrap();
        let before = store.tasks().to_vec();

        let err = store.import_snapshot("\"not an array\"").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
        assert!(store.import_snapshot("not an array").is_err());
        assert!(store.import_snapshot(r#"[{"bogus": true}]"#).is_err());

        assert_eq!(store.tasks(), before.as_slice());
        assert_eq!(store.slot().saves(), 1);
    }

    #[test]
    fn test_open_loads_saved_tasks() {
        let (_clock, mut store) = create_test_store();
        store.add("Persisted", Priority::High).unwrap();
        let slot = store.slot().clone();

        let reopened = TaskStore::open(slot);
        assert_eq!(reopened.tasks(), store.tasks());
    }

    #[test]
    fn test_open_corrupt_slot_gives_empty_list() {
        let store = TaskStore::open(MemorySlot::with_data("{ definitely not tasks"));
        assert!(store.is_empty());

        let store = TaskStore::open(MemorySlot::with_data(r#"{"tasks": []}"#));
        assert!(store.is_empty());
    }

    #[test]
    fn test_persistence_failure_keeps_in_memory_change() {
        let mut store = TaskStore::open(MockStorageSlot::new());
        let task = store.add("Saved", Priority::Medium).unwrap();

        store.slot_mut().set_fail_saves(true);
        let err = store.add("Not saved", Priority::Medium).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert!(!err.is_no_op());
        assert_eq!(store.len(), 2);

        let err = store.toggle_complete(&task.id).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert!(store.get(&task.id).unwrap().completed);

        // The store is still usable once writes work again
        store.slot_mut().set_fail_saves(false);
        store.delete(&task.id).unwrap();
        let saved = crate::tasks::snapshot::parse(store.slot().written().unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].text, "Not saved");
        assert_eq!(store.slot().save_attempts(), 4);
    }

    #[test]
    fn test_event_log_records_mutations() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = EventLog::in_dir(dir.path());
        let mut store = TaskStore::open(MemorySlot::new()).with_event_log(log.clone());

        let task = store.add("Logged", Priority::Medium).unwrap();
        store.toggle_complete(&task.id).unwrap();
        store.clear_completed().unwrap();
        let _ = store.delete("missing");

        let content = std::fs::read_to_string(log.path()).unwrap();
        let operations: Vec<String> = content
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
            .map(|v| v["operation"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(operations, vec!["add", "toggle_complete", "clear_completed"]);
    }

    #[test]
    fn test_buy_milk_scenario() {
        let (_clock, mut store) = create_test_store();
        let task = store.add("Buy milk", Priority::Low).unwrap();
        store.toggle_complete(&task.id).unwrap();

        let stats = store.stats();
        assert_eq!(
            (stats.total, stats.completed, stats.pending, stats.completion_rate),
            (1, 1, 0, 100)
        );
    }

    #[test]
    fn test_store_moves_across_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<TaskStore<MemorySlot>>();
        assert_send::<TaskStore<MockStorageSlot>>();

        let (clock, mut store) = create_test_store();
        let handle = std::thread::spawn(move || {
            store.add("Water plants", Priority::Medium).unwrap();
            store
        });
        let store = handle.join().unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].created_at, clock.now());
    }
}
