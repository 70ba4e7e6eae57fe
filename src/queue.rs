use crate::command::Command;

/// Ordered buffer of commands accumulated during one request.
///
/// Insertion order is kept as-is: no reordering, no deduplication. The queue
/// belongs to a single request and is never shared, so it carries no locking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command at the tail.
    pub fn append(&mut self, command: Command) {
        log::trace!("gaq: queued {}", command.name());
        self.commands.push(command);
    }

    /// Appends every command in order at the tail.
    pub fn extend<I: IntoIterator<Item = Command>>(&mut self, commands: I) {
        self.commands.extend(commands);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Read-only view of the queued commands.
    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }

    /// Takes the current contents and leaves the queue empty.
    ///
    /// The returned vector is owned by the caller; anything appended afterwards
    /// lands in the (now empty) queue and never in the snapshot.
    pub fn snapshot_and_clear(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}

impl<'a> IntoIterator for &'a CommandQueue {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
