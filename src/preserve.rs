//! Preserving queued commands across one redirect.
//!
//! A page that redirects never renders its snippet, so anything it queued would
//! be lost. [`preserve`] stores the pending commands in session storage under
//! [`PRESERVE_KEY`] before the redirect; [`restore`] moves them back into the
//! queue of the next request and deletes the key, so they are replayed exactly
//! once.
//!
//! Restored commands are appended at the tail of the queue. Call [`restore`]
//! before recording anything else in the request if the restored commands
//! should come first.

use crate::command::Command;
use crate::errors::PreserveError;
use crate::queue::CommandQueue;
use crate::storage::StorageArea;

/// Session key the pending commands are stored under.
pub const PRESERVE_KEY: &str = "gaq";

/// Stores the queue's commands without clearing the queue.
///
/// An empty queue writes nothing, leaving any earlier value in place. A
/// non-empty queue overwrites whatever an earlier preserve stored.
pub fn preserve(queue: &CommandQueue, storage: &dyn StorageArea) -> Result<(), PreserveError> {
    if queue.is_empty() {
        return Ok(());
    }

    let encoded = serde_json::to_string(queue.as_slice())?;
    storage.set_item(PRESERVE_KEY, &encoded)?;
    log::debug!("gaq: preserved {} command(s) for the next request", queue.len());
    Ok(())
}

/// Appends previously preserved commands to the queue and deletes them from storage.
///
/// Returns the number of restored commands. Nothing stored is a no-op. A stored
/// value that no longer decodes is discarded.
pub fn restore(queue: &mut CommandQueue, storage: &dyn StorageArea) -> Result<usize, PreserveError> {
    let Some(raw) = storage.get_item(PRESERVE_KEY) else {
        return Ok(0);
    };

    let restored = match serde_json::from_str::<Vec<Command>>(&raw) {
        Ok(commands) => commands,
        Err(e) => {
            log::warn!("gaq: discarding undecodable preserved commands: {e}");
            Vec::new()
        }
    };
    storage.remove_item(PRESERVE_KEY)?;

    let count = restored.len();
    queue.extend(restored);
    log::debug!("gaq: restored {count} preserved command(s)");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Argument;
    use crate::storage::{InMemorySessionStore, SessionId, SessionStore};
    use anyhow::anyhow;
    use std::sync::Arc;

    fn area() -> Arc<dyn StorageArea> {
        InMemorySessionStore::new().area(SessionId::new())
    }

    fn sample() -> Vec<Command> {
        vec![
            Command::new("_trackEvent", vec![Argument::from("A"), "B".into(), Argument::Omitted, 3.into()]),
            Command::new("_setCustomVar", vec![Argument::from(1), "k".into(), "undefined".into(), true.into()]),
            Command::bare("_trackTrans"),
        ]
    }

    #[test]
    fn round_trip_restores_exactly_once() {
        let storage = area();
        let mut before = CommandQueue::new();
        before.extend(sample());

        preserve(&before, storage.as_ref()).unwrap();
        // preserving does not clear
        assert_eq!(before.len(), 3);

        let mut after = CommandQueue::new();
        assert_eq!(restore(&mut after, storage.as_ref()).unwrap(), 3);
        assert_eq!(after.as_slice(), sample().as_slice());
        assert!(storage.get_item(PRESERVE_KEY).is_none());

        // second restore without a new preserve is a no-op
        assert_eq!(restore(&mut after, storage.as_ref()).unwrap(), 0);
        assert_eq!(after.len(), 3);
    }

    #[test]
    fn round_trip_keeps_numbers_without_a_json_form() {
        let storage = area();
        let mut before = CommandQueue::new();
        for n in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, -0.0, 0.0, 12.5] {
            before.append(Command::new("_setSampleRate", vec![Argument::Number(n)]));
        }
        let literals: Vec<String> = before.iter().map(Command::to_literal).collect();

        preserve(&before, storage.as_ref()).unwrap();
        let mut after = CommandQueue::new();
        assert_eq!(restore(&mut after, storage.as_ref()).unwrap(), 6);

        let restored: Vec<String> = after.iter().map(Command::to_literal).collect();
        assert_eq!(restored, literals);
        assert_eq!(restored[0], r#"["_setSampleRate",Infinity]"#);
        assert_eq!(restored[3], r#"["_setSampleRate",-0]"#);
    }

    #[test]
    fn preserving_an_empty_queue_writes_nothing() {
        let storage = area();
        preserve(&CommandQueue::new(), storage.as_ref()).unwrap();
        assert!(storage.get_item(PRESERVE_KEY).is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn preserving_an_empty_queue_keeps_earlier_value() {
        let storage = area();
        let mut q = CommandQueue::new();
        q.append(Command::bare("_trackTrans"));
        preserve(&q, storage.as_ref()).unwrap();
        let stored = storage.get_item(PRESERVE_KEY);

        preserve(&CommandQueue::new(), storage.as_ref()).unwrap();
        assert_eq!(storage.get_item(PRESERVE_KEY), stored);
    }

    #[test]
    fn second_preserve_overwrites_first() {
        let storage = area();
        let mut first = CommandQueue::new();
        first.append(Command::bare("_first"));
        let mut second = CommandQueue::new();
        second.append(Command::bare("_second"));

        preserve(&first, storage.as_ref()).unwrap();
        preserve(&second, storage.as_ref()).unwrap();

        let mut q = CommandQueue::new();
        restore(&mut q, storage.as_ref()).unwrap();
        assert_eq!(q.as_slice(), &[Command::bare("_second")]);
    }

    #[test]
    fn restore_appends_after_existing_commands() {
        let storage = area();
        let mut old = CommandQueue::new();
        old.append(Command::bare("_restored"));
        preserve(&old, storage.as_ref()).unwrap();

        let mut q = CommandQueue::new();
        q.append(Command::bare("_early"));
        restore(&mut q, storage.as_ref()).unwrap();
        let names: Vec<&str> = q.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["_early", "_restored"]);
    }

    #[test]
    fn undecodable_value_is_discarded() {
        let storage = area();
        storage.set_item(PRESERVE_KEY, "{not json").unwrap();

        let mut q = CommandQueue::new();
        assert_eq!(restore(&mut q, storage.as_ref()).unwrap(), 0);
        assert!(q.is_empty());
        assert!(storage.get_item(PRESERVE_KEY).is_none());
    }

    struct FailingArea;

    impl StorageArea for FailingArea {
        fn get_item(&self, _key: &str) -> Option<String> {
            Some("[[\"_trackTrans\"]]".to_string())
        }
        fn set_item(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow!("backend down"))
        }
        fn remove_item(&self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow!("backend down"))
        }
        fn clear(&self) -> anyhow::Result<()> {
            Ok(())
        }
        fn len(&self) -> usize {
            1
        }
        fn keys(&self) -> Vec<String> {
            vec![PRESERVE_KEY.to_string()]
        }
    }

    #[test]
    fn storage_failures_propagate() {
        let mut q = CommandQueue::new();
        q.append(Command::bare("_trackTrans"));
        assert!(matches!(preserve(&q, &FailingArea), Err(PreserveError::Storage(_))));

        // nothing is restored when the key cannot be consumed
        let mut fresh = CommandQueue::new();
        assert!(matches!(restore(&mut fresh, &FailingArea), Err(PreserveError::Storage(_))));
        assert!(fresh.is_empty());
    }
}
