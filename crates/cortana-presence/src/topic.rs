//! Topic codec.
//!
//! A channel topic is a list of segments joined by a separator. Segment 0
//! belongs to the bot and reads `"<prefix><status>[, <extra>] "`; every
//! other segment is passed through byte for byte.

use crate::status::{ClubStatus, StatusRecord};

/// Result of decoding a topic string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTopic {
    /// Status announced in segment 0, if it carries a recognizable one.
    pub status: Option<ClubStatus>,
    pub extra: String,
    /// Segments 1..N, verbatim.
    pub rest: Vec<String>,
}

/// Encodes status records into topic segment 0 and back.
#[derive(Debug, Clone)]
pub struct TopicCodec {
    prefix: String,
    separator: String,
}

impl TopicCodec {
    pub fn new(prefix: &str, separator: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            separator: separator.to_string(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Segment 0 for `record`, trailing space included.
    pub fn encode(&self, record: &StatusRecord) -> String {
        if record.extra.is_empty() {
            format!("{}{} ", self.prefix, record.status)
        } else {
            format!("{}{}, {} ", self.prefix, record.status, record.extra)
        }
    }

    /// Human-readable announcement (segment 0 without padding).
    pub fn announcement(&self, record: &StatusRecord) -> String {
        self.encode(record).trim_end().to_string()
    }

    /// Split a topic into the bot's status and the passthrough segments.
    ///
    /// A topic without any separator is treated as passthrough text with an
    /// empty segment 0, unless it starts with the status prefix, in which
    /// case it is segment 0 alone.
    pub fn decode(&self, topic: &str) -> DecodedTopic {
        let (head, rest): (&str, Vec<String>) = if !topic.contains(self.separator.as_str()) {
            if topic.is_empty() {
                ("", Vec::new())
            } else if self.owns(topic) {
                (topic, Vec::new())
            } else {
                ("", vec![topic.to_string()])
            }
        } else {
            let mut parts = topic.split(self.separator.as_str());
            let head = parts.next().unwrap_or_default();
            (head, parts.map(str::to_string).collect())
        };

        let (status, extra) = self.decode_segment(head);
        DecodedTopic {
            status,
            extra,
            rest,
        }
    }

    /// Replace segment 0 of `topic` with `record`, keeping the rest intact.
    pub fn apply(&self, topic: &str, record: &StatusRecord) -> String {
        let decoded = self.decode(topic);
        let mut out = self.encode(record);
        if !decoded.rest.is_empty() {
            out.push_str(&self.separator);
            out.push_str(&decoded.rest.join(&self.separator));
        }
        out
    }

    fn owns(&self, segment: &str) -> bool {
        let marker = self.prefix.trim_end();
        !marker.is_empty() && segment.trim_start().starts_with(marker)
    }

    fn decode_segment(&self, segment: &str) -> (Option<ClubStatus>, String) {
        if !self.owns(segment) {
            return (None, String::new());
        }
        let body = &segment.trim_start()[self.prefix.trim_end().len()..];
        let (word, extra) = body.split_once(',').unwrap_or((body, ""));
        (ClubStatus::from_word(word), extra.trim().to_string())
    }
}
