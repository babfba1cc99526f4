//! Addressed events waiting to be delivered.

use parlor_protocol::{PlayerId, Recipient, ServerEvent};

/// Events produced by one room operation, in emission order.
///
/// The room and its modes only ever push here; the actor drains the queue
/// after each command and resolves recipients against live connections.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: Vec<(Recipient, ServerEvent)>,
}

impl Outbox {
    pub fn push(&mut self, to: Recipient, event: ServerEvent) {
        self.queue.push((to, event));
    }

    pub fn to_all(&mut self, event: ServerEvent) {
        self.push(Recipient::All, event);
    }

    pub fn to_player(&mut self, id: PlayerId, event: ServerEvent) {
        self.push(Recipient::Player(id), event);
    }

    pub fn to_all_except(&mut self, id: PlayerId, event: ServerEvent) {
        self.push(Recipient::AllExcept(id), event);
    }

    /// Takes everything queued so far.
    pub fn drain(&mut self) -> Vec<(Recipient, ServerEvent)> {
        std::mem::take(&mut self.queue)
    }
}
