use std::sync::Mutex;

use crate::native::NativeError;
use crate::observer::QueryObserver;
use crate::types::{Query, TransactionOptions};

#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    Query { tag: &'static str, sql: String },
    NativeError(String),
    Transaction {
        tag: &'static str,
        options: TransactionOptions,
    },
}

/// Observer that keeps every event it sees, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().expect("observer poisoned").clone()
    }

    /// Transaction tags in the order they were seen.
    #[must_use]
    pub fn transaction_tags(&self) -> Vec<&'static str> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ObservedEvent::Transaction { tag, .. } => Some(tag),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ObservedEvent) {
        self.events.lock().expect("observer poisoned").push(event);
    }
}

impl QueryObserver for RecordingObserver {
    fn before_query(&self, tag: &'static str, query: &Query) {
        self.push(ObservedEvent::Query {
            tag,
            sql: query.sql.clone(),
        });
    }

    fn on_native_error(&self, error: &NativeError) {
        self.push(ObservedEvent::NativeError(error.to_string()));
    }

    fn on_transaction(&self, tag: &'static str, options: &TransactionOptions) {
        self.push(ObservedEvent::Transaction {
            tag,
            options: *options,
        });
    }
}
