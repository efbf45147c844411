//! Test utilities: a scripted in-memory MySQL client and a recording observer.

mod mock;
mod observer;

pub use mock::{ExecutedQuery, MockConnection, MockManager, MockResponse, MockServer, column};
pub use observer::{ObservedEvent, RecordingObserver};
