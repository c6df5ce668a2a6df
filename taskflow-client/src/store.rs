/// In-memory task store with snapshot/rollback
///
/// The store is the single owner of client-held task state. It is mutated
/// only through the methods here, which keeps the set of legal transitions
/// small and makes the optimistic protocol auditable:
///
/// - `snapshot` / `restore` bracket every optimistic mutation
/// - `replace_all` is the non-optimistic list fetch
/// - `insert` is duplicate-guarded by id, so applying the same create
///   confirmation twice (a retried response, say) leaves exactly one entry
/// - `allocate_temp_id` hands out negative placeholder ids for optimistic
///   creates; server ids are positive (bigserial), so the two ranges can
///   never collide
///
/// Single-threaded by design: the UI thread owns the store and processes
/// one user action at a time.

use taskflow_shared::models::task::Task;

/// Immutable copy of the store contents, taken before an optimistic
/// mutation and dropped once the server confirms
#[derive(Debug, Clone)]
pub struct Snapshot(Vec<Task>);

/// Client-side task list state container
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_temp_id: i64,
}

impl TaskStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current task list, in server order (newest first after a refresh)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id
    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Number of tasks held
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True if no tasks are held
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Takes an immutable copy of the current list
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.tasks.clone())
    }

    /// Restores a previously taken snapshot, discarding all changes since
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.tasks = snapshot.0;
    }

    /// Replaces the entire list with a server-provided one
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Drops everything (logout)
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Allocates a placeholder id for an optimistic create
    ///
    /// Ids count down from -1 and are never reused within a session.
    pub fn allocate_temp_id(&mut self) -> i64 {
        self.next_temp_id -= 1;
        self.next_temp_id
    }

    /// Inserts a task at the front unless one with the same id exists
    ///
    /// Returns `false` (and leaves the list unchanged) on a duplicate id.
    pub fn insert(&mut self, task: Task) -> bool {
        if self.tasks.iter().any(|t| t.id == task.id) {
            return false;
        }

        self.tasks.insert(0, task);
        true
    }

    /// Replaces a task by id, or inserts it (duplicate-guarded) if absent
    pub fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => {
                self.insert(task);
            }
        }
    }

    /// Swaps an optimistic placeholder for the server-confirmed entity
    ///
    /// The placeholder is removed first; the confirmed task is then
    /// inserted through the duplicate guard, so a confirmation that has
    /// already been applied is a no-op rather than a second copy.
    pub fn confirm(&mut self, temp_id: i64, confirmed: Task) {
        self.tasks.retain(|t| t.id != temp_id);
        self.insert(confirmed);
    }

    /// Removes a task by id, returning it if present
    pub fn remove(&mut self, id: i64) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Applies an in-place mutation to a task; returns `false` if absent
    pub fn modify<F: FnOnce(&mut Task)>(&mut self, id: i64, f: F) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                f(task);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: i64, title: &str) -> Task {
        let now = Utc::now();
        Task {
            id,
            user_id: "user-1".to_string(),
            title: title.to_string(),
            description: None,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut store = TaskStore::new();
        store.insert(task(1, "One"));
        store.insert(task(2, "Two"));

        let snapshot = store.snapshot();

        store.remove(1);
        store.modify(2, |t| t.title = "Mutated".to_string());
        assert_eq!(store.len(), 1);

        store.restore(snapshot);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(2).unwrap().title, "Two");
    }

    #[test]
    fn test_insert_duplicate_guard() {
        let mut store = TaskStore::new();

        assert!(store.insert(task(7, "First copy")));
        // Same id applied again: list keeps exactly one entry
        assert!(!store.insert(task(7, "Second copy")));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(7).unwrap().title, "First copy");
    }

    #[test]
    fn test_confirm_swaps_placeholder() {
        let mut store = TaskStore::new();

        let temp_id = store.allocate_temp_id();
        assert!(temp_id < 0);
        store.insert(task(temp_id, "Optimistic"));

        store.confirm(temp_id, task(42, "Confirmed"));

        assert_eq!(store.len(), 1);
        assert!(store.get(temp_id).is_none());
        assert_eq!(store.get(42).unwrap().title, "Confirmed");
    }

    #[test]
    fn test_confirm_applied_twice_keeps_one_entry() {
        let mut store = TaskStore::new();

        let temp_id = store.allocate_temp_id();
        store.insert(task(temp_id, "Optimistic"));

        store.confirm(temp_id, task(42, "Confirmed"));
        // A retried/duplicate response
        store.confirm(temp_id, task(42, "Confirmed again"));

        let with_id: Vec<_> = store.tasks().iter().filter(|t| t.id == 42).collect();
        assert_eq!(with_id.len(), 1);
        assert_eq!(with_id[0].title, "Confirmed");
    }

    #[test]
    fn test_temp_ids_never_collide_with_server_ids() {
        let mut store = TaskStore::new();
        let a = store.allocate_temp_id();
        let b = store.allocate_temp_id();

        assert!(a < 0 && b < 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_replace_all_overwrites_local_state() {
        let mut store = TaskStore::new();
        store.insert(task(1, "Stale"));

        store.replace_all(vec![task(2, "Fresh"), task(3, "Fresher")]);

        assert_eq!(store.len(), 2);
        assert!(store.get(1).is_none());
    }

    #[test]
    fn test_modify_missing_task() {
        let mut store = TaskStore::new();
        assert!(!store.modify(99, |t| t.is_completed = true));
    }
}
