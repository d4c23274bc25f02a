// Presentation state over the task store

use crate::error::StorageError;
use crate::filter::TaskFilter;
use crate::models::Task;
use crate::store::TaskStore;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::debug;

/// Holds the list currently on screen and routes every mutation through the store
///
/// After each successful mutation the full list is reloaded from the store and
/// published once to every subscriber. Mutations take `&mut self`, which is the
/// serialization point: two mutations on one controller can never overlap, so a
/// slower refresh can't overwrite a newer one.
pub struct TaskListController {
    store: TaskStore,
    current_tasks: Vec<Task>,
    show_completed: bool,
    subscribers: Vec<Sender<Vec<Task>>>,
}

impl TaskListController {
    /// Take ownership of the store and load the initial list
    pub fn new(store: TaskStore) -> Result<Self, StorageError> {
        let current_tasks = store.get_all()?;
        debug!(count = current_tasks.len(), "Loaded initial task list");

        Ok(Self {
            store,
            current_tasks,
            show_completed: false,
            subscribers: Vec::new(),
        })
    }

    /// Receive the full task list after every completed mutation
    pub fn subscribe(&mut self) -> Receiver<Vec<Task>> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Current snapshot, unfiltered
    pub fn tasks(&self) -> &[Task] {
        &self.current_tasks
    }

    pub fn show_completed(&self) -> bool {
        self.show_completed
    }

    /// Snapshot narrowed to the completed or pending view
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let filter = TaskFilter::for_view(self.show_completed);
        self.current_tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Look up a task in the current snapshot
    pub fn find(&self, id: i64) -> Option<&Task> {
        self.current_tasks.iter().find(|t| t.id == id)
    }

    /// Add a pending task; an empty description is ignored
    pub fn add_task(&mut self, description: &str) -> Result<(), StorageError> {
        if description.is_empty() {
            debug!("add_task: empty description, ignoring");
            return Ok(());
        }

        self.store.insert(description)?;
        self.refresh()
    }

    pub fn toggle_task_completion(&mut self, task: &Task) -> Result<(), StorageError> {
        self.store.update(&task.toggled())?;
        self.refresh()
    }

    pub fn edit_task(&mut self, task: &Task, new_description: &str) -> Result<(), StorageError> {
        self.store.update(&task.with_description(new_description))?;
        self.refresh()
    }

    pub fn delete_task(&mut self, task: &Task) -> Result<(), StorageError> {
        self.store.delete(task)?;
        self.refresh()
    }

    pub fn delete_all_tasks(&mut self) -> Result<(), StorageError> {
        self.store.delete_all()?;
        self.refresh()
    }

    /// Switch between the completed and pending view
    ///
    /// Only the flag changes; the published list stays unfiltered.
    pub fn filter_tasks(&mut self, show_completed: bool) {
        self.show_completed = show_completed;
    }

    /// Close the owned store
    pub fn close(self) -> Result<(), StorageError> {
        self.store.close()
    }

    fn refresh(&mut self) -> Result<(), StorageError> {
        self.current_tasks = self.store.get_all()?;
        self.publish();
        Ok(())
    }

    fn publish(&mut self) {
        let snapshot = &self.current_tasks;
        let before = self.subscribers.len();

        // Dropped receivers are pruned, not reported
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());

        let pruned = before - self.subscribers.len();
        if pruned > 0 {
            debug!(pruned, "Dropped disconnected task list subscribers");
        }
        debug!(count = snapshot.len(), subscribers = self.subscribers.len(), "Published task list");
    }
}
