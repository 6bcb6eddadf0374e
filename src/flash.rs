use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

struct Pending<V> {
    ticket: u64,
    value: V,
    handle: JoinHandle<()>,
}

struct Slots<K, V> {
    next_ticket: u64,
    pending: HashMap<K, Pending<V>>,
}

/// One delayed task per key. Scheduling again for the same key aborts the
/// task that is still waiting and hands its value back to the caller.
///
/// A task that ran to completion only removes its own slot: the ticket has to
/// match, so it can never evict a task scheduled after it.
pub struct FlashTimers<K, V> {
    slots: Arc<Mutex<Slots<K, V>>>,
}

impl<K, V> FlashTimers<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(Slots {
                next_ticket: 0,
                pending: HashMap::new(),
            })),
        }
    }

    /// Runs `task(value)` once `after` has elapsed, replacing whatever was
    /// pending for `key`. Returns the value of the replaced task.
    pub fn schedule<F, Fut>(&self, key: K, value: V, after: Duration, task: F) -> Option<V>
    where
        F: FnOnce(V) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slots = lock(&self.slots);
        slots.next_ticket += 1;
        let ticket = slots.next_ticket;

        let shared = Arc::clone(&self.slots);
        let task_key = key.clone();
        let task_value = value.clone();
        // The guard is still held, so the task cannot look at its slot before it is inserted
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            task(task_value).await;

            let mut slots = lock(&shared);
            if slots.pending.get(&task_key).map(|p| p.ticket) == Some(ticket) {
                slots.pending.remove(&task_key);
            }
        });

        slots
            .pending
            .insert(
                key,
                Pending {
                    ticket,
                    value,
                    handle,
                },
            )
            .map(|previous| {
                previous.handle.abort();
                previous.value
            })
    }

    /// Aborts the pending task for `key` and returns its value.
    pub fn cancel(&self, key: &K) -> Option<V> {
        lock(&self.slots).pending.remove(key).map(|previous| {
            previous.handle.abort();
            previous.value
        })
    }

    pub fn is_pending(&self, key: &K) -> bool {
        lock(&self.slots).pending.contains_key(key)
    }
}

impl<K, V> Default for FlashTimers<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

// Nothing panics while holding the lock, but a poisoned map is still usable
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};

    const SHORT: Duration = Duration::from_millis(20);
    const SETTLE: Duration = Duration::from_millis(150);

    fn recorder() -> (
        mpsc::UnboundedSender<&'static str>,
        mpsc::UnboundedReceiver<&'static str>,
    ) {
        mpsc::unbounded_channel()
    }

    #[tokio::test]
    async fn runs_after_delay_and_frees_the_slot() {
        let timers = FlashTimers::new();
        let (tx, mut rx) = recorder();

        assert_eq!(
            timers.schedule(1, "first", SHORT, move |v| async move {
                let _ = tx.send(v);
            }),
            None
        );
        assert!(timers.is_pending(&1));

        let fired = timeout(SETTLE, rx.recv()).await.unwrap();
        assert_eq!(fired, Some("first"));

        sleep(SHORT).await;
        assert!(!timers.is_pending(&1));
    }

    #[tokio::test]
    async fn rescheduling_aborts_the_older_task() {
        let timers = FlashTimers::new();
        let (tx, mut rx) = recorder();
        let tx2 = tx.clone();

        timers.schedule(7, "old", SHORT * 2, move |v| async move {
            let _ = tx.send(v);
        });
        let replaced = timers.schedule(7, "new", SHORT * 2, move |v| async move {
            let _ = tx2.send(v);
        });
        assert_eq!(replaced, Some("old"));

        sleep(SETTLE).await;
        assert_eq!(rx.try_recv(), Ok("new"));
        assert!(rx.try_recv().is_err());
        assert!(!timers.is_pending(&7));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn finishing_old_task_keeps_the_newer_slot() {
        let timers = FlashTimers::new();
        let (tx, mut rx) = recorder();
        let tx2 = tx.clone();

        // Blocks its worker so the abort from the reschedule cannot stop it
        timers.schedule(9, "old", SHORT, move |v| async move {
            std::thread::sleep(Duration::from_millis(100));
            let _ = tx.send(v);
        });
        sleep(SHORT * 2).await;

        let replaced = timers.schedule(9, "new", Duration::from_millis(400), move |v| async move {
            let _ = tx2.send(v);
        });
        assert_eq!(replaced, Some("old"));

        let fired = timeout(SETTLE, rx.recv()).await.unwrap();
        assert_eq!(fired, Some("old"));
        sleep(SHORT).await;
        assert!(timers.is_pending(&9));

        let fired = timeout(Duration::from_millis(600), rx.recv()).await.unwrap();
        assert_eq!(fired, Some("new"));
        sleep(SHORT).await;
        assert!(!timers.is_pending(&9));
    }

    #[tokio::test]
    async fn cancelled_task_never_runs() {
        let timers = FlashTimers::new();
        let (tx, mut rx) = recorder();

        timers.schedule(3, "cancelled", SHORT, move |v| async move {
            let _ = tx.send(v);
        });
        assert_eq!(timers.cancel(&3), Some("cancelled"));
        assert_eq!(timers.cancel(&3), None);

        sleep(SETTLE).await;
        assert!(rx.try_recv().is_err());
        assert!(!timers.is_pending(&3));
    }

    #[tokio::test]
    async fn keys_do_not_interfere() {
        let timers = FlashTimers::new();
        let (tx, mut rx) = recorder();
        let tx2 = tx.clone();

        timers.schedule(1, "one", SHORT, move |v| async move {
            let _ = tx.send(v);
        });
        assert_eq!(
            timers.schedule(2, "two", SHORT, move |v| async move {
                let _ = tx2.send(v);
            }),
            None
        );

        sleep(SETTLE).await;
        let mut fired = vec![rx.try_recv().unwrap(), rx.try_recv().unwrap()];
        fired.sort();
        assert_eq!(fired, vec!["one", "two"]);
    }
}
