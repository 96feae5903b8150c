// Copyright (c) 2025 - Cowboy AI, Inc.
//! Bridge into `futures::Stream`
//!
//! Lets async code consume a push stream with `StreamExt`. Values are
//! buffered in an unbounded channel; an engine error arrives as one `Err`
//! item and ends the stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::mpsc;
use futures::stream::Stream as FuturesStream;
use futures::StreamExt;

use super::{Notification, Observer, Stream, Subscription, Value};
use crate::errors::FrpResult;

/// A subscribed push stream consumed as a `futures::Stream`
///
/// Dropping it unsubscribes.
pub struct SubscribedStream<T> {
    receiver: mpsc::UnboundedReceiver<FrpResult<T>>,
    subscription: Subscription,
}

impl<T: Value> Stream<T> {
    /// Subscribe and expose the deliveries as a `futures::Stream`
    pub fn into_futures(&self) -> SubscribedStream<T> {
        let (sender, receiver) = mpsc::unbounded();
        let subscription = self.subscribe(Observer::new(move |notification| match notification {
            Notification::Next(value) => {
                // The receiver may already be gone; delivery is best effort.
                let _ = sender.unbounded_send(Ok(value));
            }
            Notification::Error(e) => {
                let _ = sender.unbounded_send(Err(e));
                sender.close_channel();
            }
            Notification::Completed => sender.close_channel(),
        }));

        SubscribedStream {
            receiver,
            subscription,
        }
    }
}

impl<T> Unpin for SubscribedStream<T> {}

impl<T> FuturesStream for SubscribedStream<T> {
    type Item = FrpResult<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_next_unpin(cx)
    }
}

impl<T> Drop for SubscribedStream<T> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
