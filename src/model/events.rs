use std::sync::mpsc::{Receiver, Sender, channel};

/// Change notification emitted by the results model.
///
/// Structural changes mirror standard list observation: each insert or
/// removal arrives as an about-to/done pair carrying an inclusive row
/// range. Property changes carry the new value.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    RowsAboutToBeInserted { first: usize, last: usize },
    RowsInserted { first: usize, last: usize },
    RowsAboutToBeRemoved { first: usize, last: usize },
    RowsRemoved { first: usize, last: usize },
    DataChanged { first: usize, last: usize },
    /// All rows were discarded at once.
    Reset,
    QueryStringChanged(String),
    QueryingChanged(bool),
    LimitChanged(usize),
    ProviderChanged(Option<String>),
}

/// Fan-out of model events to any number of subscribers. Subscribers that
/// dropped their receiver are pruned on the next emission.
#[derive(Default)]
pub(crate) struct EventFanout {
    subscribers: Vec<Sender<ModelEvent>>,
}

impl EventFanout {
    pub(crate) fn subscribe(&mut self) -> Receiver<ModelEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub(crate) fn emit(&mut self, event: ModelEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_to_every_subscriber() {
        let mut fanout = EventFanout::default();
        let first = fanout.subscribe();
        let second = fanout.subscribe();

        fanout.emit(ModelEvent::LimitChanged(5));
        assert_eq!(first.try_recv().unwrap(), ModelEvent::LimitChanged(5));
        assert_eq!(second.try_recv().unwrap(), ModelEvent::LimitChanged(5));
    }

    #[test]
    fn prunes_dropped_subscribers() {
        let mut fanout = EventFanout::default();
        let kept = fanout.subscribe();
        drop(fanout.subscribe());

        fanout.emit(ModelEvent::Reset);
        fanout.emit(ModelEvent::QueryingChanged(true));
        assert_eq!(kept.try_recv().unwrap(), ModelEvent::Reset);
        assert_eq!(
            kept.try_recv().unwrap(),
            ModelEvent::QueryingChanged(true)
        );
    }
}
