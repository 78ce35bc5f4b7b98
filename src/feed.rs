// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-process fan-out of newly appended messages.

use crate::models::Message;
use futures::stream::{self, Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

/// Broadcast feed of appended messages.
#[derive(Clone)]
pub struct MessageFeed {
    sender: broadcast::Sender<Message>,
    closed: Arc<watch::Sender<bool>>,
}

impl MessageFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        let (closed, _) = watch::channel(false);
        Self {
            sender,
            closed: Arc::new(closed),
        }
    }

    /// Publish a message to every current subscriber.
    pub fn publish(&self, message: &Message) {
        match self.sender.send(message.clone()) {
            Ok(count) => debug!(id = %message.id, subscribers = count, "Published message"),
            Err(_) => debug!(id = %message.id, "Published message but no subscribers"),
        }
    }

    /// End every subscriber stream, current and future.
    pub fn close(&self) {
        if !self.closed.send_replace(true) {
            debug!(subscribers = self.subscriber_count(), "Closing message feed");
        }
    }

    /// Stream of messages published after this call. A subscriber that
    /// falls more than `capacity` messages behind skips the gap. The stream
    /// ends once the feed is closed.
    pub fn subscribe(&self) -> impl Stream<Item = Message> + Send + 'static {
        let receiver = self.sender.subscribe();
        let mut closed = self.closed.subscribe();
        let until_closed = async move {
            // Sender lives as long as any feed clone; treat its drop as closed too
            while !*closed.borrow_and_update() {
                if closed.changed().await.is_err() {
                    break;
                }
            }
        };

        stream::unfold(receiver, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(message) => return Some((message, rx)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "Message feed subscriber lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .take_until(until_closed)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    fn message(content: &str) -> Message {
        Message {
            id: content.to_string(),
            author: "alice".to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_messages() {
        let feed = MessageFeed::new(8);
        let mut stream = Box::pin(feed.subscribe());
        assert_eq!(feed.subscriber_count(), 1);

        feed.publish(&message("one"));
        feed.publish(&message("two"));

        assert_eq!(stream.next().await.unwrap().content, "one");
        assert_eq!(stream.next().await.unwrap().content, "two");
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_to_retained() {
        let feed = MessageFeed::new(2);
        let mut stream = Box::pin(feed.subscribe());

        for content in ["a", "b", "c", "d"] {
            feed.publish(&message(content));
        }

        assert_eq!(stream.next().await.unwrap().content, "c");
        assert_eq!(stream.next().await.unwrap().content, "d");
    }

    #[tokio::test]
    async fn test_close_ends_open_streams() {
        let feed = MessageFeed::new(8);
        let mut stream = Box::pin(feed.subscribe());

        feed.publish(&message("last"));
        feed.clone().close();

        let ended = tokio::time::timeout(Duration::from_secs(1), async {
            while stream.next().await.is_some() {}
        })
        .await;
        assert!(ended.is_ok(), "stream still open after close");
    }

    #[tokio::test]
    async fn test_subscribe_after_close_is_empty() {
        let feed = MessageFeed::new(8);
        feed.close();

        let mut stream = Box::pin(feed.subscribe());
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn test_publish_without_subscribers_is_harmless() {
        let feed = MessageFeed::new(0);
        feed.publish(&message("nobody listening"));
        assert_eq!(feed.subscriber_count(), 0);
    }
}
