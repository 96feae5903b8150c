// Copyright (c) 2025 - Cowboy AI, Inc.
//! Observers and the notifications they receive

use std::fmt;
use std::sync::Arc;

use crate::errors::FrpError;

/// One delivery to an observer
#[derive(Debug, Clone)]
pub enum Notification<T> {
    /// A value
    Next(T),
    /// The stream failed on its engine error channel (terminal)
    Error(FrpError),
    /// The stream finished (terminal)
    Completed,
}

impl<T> Notification<T> {
    /// Transform the carried value, keeping terminal notifications as they are
    pub fn map<U, F>(self, f: F) -> Notification<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Notification::Next(value) => Notification::Next(f(value)),
            Notification::Error(e) => Notification::Error(e),
            Notification::Completed => Notification::Completed,
        }
    }
}

/// Receiver of notifications
///
/// Cheap to clone; clones share the same callback.
pub struct Observer<T> {
    sink: Arc<dyn Fn(Notification<T>) + Send + Sync>,
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observer<{}>", std::any::type_name::<T>())
    }
}

impl<T: Send + 'static> Observer<T> {
    /// Observer receiving every notification
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(Notification<T>) + Send + Sync + 'static,
    {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Observer receiving values only
    pub fn from_next<F>(on_next: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self::new(move |notification| {
            if let Notification::Next(value) = notification {
                on_next(value);
            }
        })
    }

    /// Deliver a notification
    pub fn notify(&self, notification: Notification<T>) {
        (self.sink)(notification)
    }

    /// Deliver a value
    pub fn next(&self, value: T) {
        self.notify(Notification::Next(value))
    }

    /// Deliver an engine error
    pub fn error(&self, error: FrpError) {
        self.notify(Notification::Error(error))
    }

    /// Deliver completion
    pub fn complete(&self) {
        self.notify(Notification::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_from_next_ignores_terminal_notifications() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let observer = Observer::from_next(move |v: i32| sink.lock().unwrap().push(v));

        observer.next(1);
        observer.error(FrpError::Stream("ignored".into()));
        observer.complete();

        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_notification_map() {
        assert!(matches!(
            Notification::Next(2).map(|x| x * 3),
            Notification::Next(6)
        ));
        assert!(matches!(
            Notification::<i32>::Completed.map(|x| x * 3),
            Notification::Completed
        ));
    }
}
