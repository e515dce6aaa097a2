use crate::runtime::event::PickerEvent;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum SchedulerCommand {
    /// Fires once after `delay` unless `key` is cancelled first.
    EmitAfter {
        key: String,
        delay: Duration,
        event: PickerEvent,
    },
    Cancel {
        key: String,
    },
}

#[derive(Debug, Clone)]
struct Guard {
    key: String,
    version: u64,
}

#[derive(Debug, Clone)]
struct DelayedTask {
    due_at: Instant,
    guard: Guard,
    event: PickerEvent,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    delayed: Vec<DelayedTask>,
    key_versions: HashMap<String, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, command: SchedulerCommand, now: Instant) {
        match command {
            SchedulerCommand::EmitAfter { key, delay, event } => {
                let version = *self.key_versions.entry(key.clone()).or_insert(0);
                self.delayed.push(DelayedTask {
                    due_at: now + delay,
                    guard: Guard { key, version },
                    event,
                });
            }
            SchedulerCommand::Cancel { key } => {
                self.bump_version(&key);
                self.delayed.retain(|task| task.guard.key != key);
            }
        }
    }

    pub fn drain_ready(&mut self, now: Instant) -> Vec<PickerEvent> {
        let mut ready = Vec::new();
        let mut idx = 0usize;
        while idx < self.delayed.len() {
            if self.delayed[idx].due_at <= now {
                let task = self.delayed.swap_remove(idx);
                if self.task_is_valid(&task) {
                    ready.push(task.event);
                }
            } else {
                idx += 1;
            }
        }

        ready
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.delayed
            .iter()
            .map(|task| task.due_at.saturating_duration_since(now))
            .fold(default_timeout, Duration::min)
    }

    pub fn pending(&self) -> usize {
        self.delayed.len()
    }

    fn task_is_valid(&self, task: &DelayedTask) -> bool {
        let current = self.key_versions.get(&task.guard.key).copied().unwrap_or(0);
        current == task.guard.version
    }

    fn bump_version(&mut self, key: &str) {
        let entry = self.key_versions.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focus(generation: u64) -> PickerEvent {
        PickerEvent::FocusPopup { generation }
    }

    #[test]
    fn emit_after_fires_once_due() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        scheduler.schedule(
            SchedulerCommand::EmitAfter {
                key: "focus".into(),
                delay: Duration::from_millis(500),
                event: focus(1),
            },
            start,
        );

        assert!(scheduler.drain_ready(start + Duration::from_millis(499)).is_empty());
        assert_eq!(
            scheduler.drain_ready(start + Duration::from_millis(500)),
            vec![focus(1)]
        );
        assert!(scheduler.drain_ready(start + Duration::from_secs(2)).is_empty());
    }

    #[test]
    fn cancel_drops_pending_task() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        scheduler.schedule(
            SchedulerCommand::EmitAfter {
                key: "focus".into(),
                delay: Duration::from_millis(500),
                event: focus(1),
            },
            start,
        );
        scheduler.schedule(SchedulerCommand::Cancel { key: "focus".into() }, start);
        scheduler.schedule(
            SchedulerCommand::EmitAfter {
                key: "focus".into(),
                delay: Duration::from_millis(500),
                event: focus(2),
            },
            start,
        );

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(
            scheduler.drain_ready(start + Duration::from_secs(1)),
            vec![focus(2)]
        );
    }

    #[test]
    fn poll_timeout_shrinks_to_next_deadline() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        assert_eq!(
            scheduler.poll_timeout(start, Duration::from_millis(100)),
            Duration::from_millis(100)
        );
        scheduler.schedule(
            SchedulerCommand::EmitAfter {
                key: "focus".into(),
                delay: Duration::from_millis(30),
                event: focus(1),
            },
            start,
        );
        assert_eq!(
            scheduler.poll_timeout(start, Duration::from_millis(100)),
            Duration::from_millis(30)
        );
    }
}
