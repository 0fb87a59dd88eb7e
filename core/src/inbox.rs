/// Conversation aggregation for the unified inbox
///
/// The backend hands the Messages view one flat, newest-first message list.
/// This module partitions it into one conversation per client and derives
/// the last message and unread count for each. The backend's sort order is
/// NOT trusted: each conversation is re-sorted by timestamp descending
/// locally, and conversations are ordered by their latest message. That
/// local ordering is the contract.
use crate::types::{Message, MessageType};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Conversation {
    pub client_id: String,
    /// Messages of this client, newest first
    pub messages: Vec<Message>,
    /// Incoming messages not yet read
    pub unread_count: usize,
}

impl Conversation {
    pub fn last_message(&self) -> &Message {
        // Non-empty by construction: a conversation only exists because at
        // least one message referenced its client_id.
        &self.messages[0]
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Partition messages by client. Union of all conversations equals the
/// input and conversations are disjoint; re-running on the same input
/// yields the same result.
pub fn group_by_client(messages: Vec<Message>) -> Vec<Conversation> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<Message>> = HashMap::new();

    for message in messages {
        if !buckets.contains_key(&message.client_id) {
            order.push(message.client_id.clone());
        }
        buckets.entry(message.client_id.clone()).or_default().push(message);
    }

    let mut conversations: Vec<Conversation> = order
        .into_iter()
        .map(|client_id| {
            let mut messages = buckets.remove(&client_id).unwrap_or_default();
            // Stable sort: equal timestamps keep backend order
            messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let unread_count = messages
                .iter()
                .filter(|m| m.message_type == MessageType::Incoming && !m.is_read)
                .count();
            Conversation {
                client_id,
                messages,
                unread_count,
            }
        })
        .collect();

    conversations.sort_by(|a, b| b.last_message().timestamp.cmp(&a.last_message().timestamp));
    conversations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageSource;
    use chrono::{TimeZone, Utc};

    fn msg(id: &str, client: &str, minute: u32, incoming: bool, read: bool) -> Message {
        Message {
            id: id.to_string(),
            client_id: client.to_string(),
            content: format!("msg {}", id),
            message_type: if incoming {
                MessageType::Incoming
            } else {
                MessageType::Outgoing
            },
            source: MessageSource::Telegram,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap(),
            is_read: read,
        }
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let input = vec![
            msg("1", "a", 30, true, false),
            msg("2", "b", 29, true, true),
            msg("3", "a", 28, false, true),
            msg("4", "c", 27, true, false),
            msg("5", "b", 26, true, false),
        ];
        let total = input.len();
        let conversations = group_by_client(input);

        let grouped: usize = conversations.iter().map(|c| c.message_count()).sum();
        assert_eq!(grouped, total);

        let mut seen = std::collections::HashSet::new();
        for conv in &conversations {
            for m in &conv.messages {
                assert_eq!(m.client_id, conv.client_id);
                assert!(seen.insert(m.id.clone()), "message {} in two groups", m.id);
            }
        }
        assert_eq!(conversations.len(), 3);
    }

    #[test]
    fn test_unread_counts_incoming_unread_only() {
        let conversations = group_by_client(vec![
            msg("1", "a", 30, true, false),
            msg("2", "a", 29, true, true),
            msg("3", "a", 28, false, false), // outgoing never counts
            msg("4", "a", 27, true, false),
        ]);
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].unread_count, 2);
    }

    #[test]
    fn test_last_message_survives_unsorted_input() {
        // Backend order violated on purpose: oldest first
        let conversations = group_by_client(vec![
            msg("old", "a", 1, true, true),
            msg("mid", "a", 15, true, true),
            msg("new", "a", 45, true, true),
        ]);
        assert_eq!(conversations[0].last_message().id, "new");
    }

    #[test]
    fn test_conversations_ordered_by_recency() {
        let conversations = group_by_client(vec![
            msg("1", "quiet", 5, true, true),
            msg("2", "busy", 50, true, true),
            msg("3", "quiet", 3, true, true),
        ]);
        assert_eq!(conversations[0].client_id, "busy");
        assert_eq!(conversations[1].client_id, "quiet");
    }

    #[test]
    fn test_idempotent_under_reaggregation() {
        let input = vec![
            msg("1", "a", 30, true, false),
            msg("2", "b", 29, true, false),
            msg("3", "a", 28, false, true),
        ];
        let first = group_by_client(input.clone());
        let second = group_by_client(input);
        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(second.iter()) {
            assert_eq!(x.client_id, y.client_id);
            assert_eq!(x.unread_count, y.unread_count);
            assert_eq!(x.last_message().id, y.last_message().id);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_client(Vec::new()).is_empty());
    }
}
