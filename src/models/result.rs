//! Aggregate and final pipeline results

use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::models::record::Record;
use crate::models::topic::Topic;

/// Output of one topic aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AggregateResult {
    /// One record summarising counts for the topic
    Summary(Record),
    /// Rows passed through largely unchanged
    Table(Vec<Record>),
    /// Several summary records under fixed keys
    #[serde(serialize_with = "serialize_keyed")]
    Keyed(Vec<(String, Record)>),
}

fn serialize_keyed<S: Serializer>(
    entries: &[(String, Record)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
}

impl AggregateResult {
    #[must_use]
    pub const fn as_summary(&self) -> Option<&Record> {
        match self {
            Self::Summary(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_table(&self) -> Option<&[Record]> {
        match self {
            Self::Table(records) => Some(records),
            _ => None,
        }
    }

    /// Look up one entry of a keyed result
    #[must_use]
    pub fn keyed(&self, key: &str) -> Option<&Record> {
        match self {
            Self::Keyed(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, r)| r),
            _ => None,
        }
    }
}

/// Why a topic was emitted in its degraded shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    /// The topic's query returned the failure sentinel
    QueryFailure,
    /// Aggregation aborted with the given error message
    Aborted(String),
}

/// A topic that did not produce real values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFault {
    pub topic: Topic,
    pub kind: FaultKind,
}

/// Keyed output of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalResult {
    date: NaiveDate,
    source_available: bool,
    topics: Vec<(Topic, AggregateResult)>,
    faults: Vec<TopicFault>,
}

impl FinalResult {
    pub(crate) const fn new(date: NaiveDate, source_available: bool) -> Self {
        Self {
            date,
            source_available,
            topics: Vec::new(),
            faults: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, topic: Topic, result: AggregateResult) {
        self.topics.push((topic, result));
    }

    pub(crate) fn record_fault(&mut self, topic: Topic, kind: FaultKind) {
        self.faults.push(TopicFault { topic, kind });
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// False when the run short-circuited because the source was unavailable
    #[must_use]
    pub const fn source_available(&self) -> bool {
        self.source_available
    }

    #[must_use]
    pub fn get(&self, topic: Topic) -> Option<&AggregateResult> {
        self.topics.iter().find(|(t, _)| *t == topic).map(|(_, r)| r)
    }

    pub fn topics(&self) -> impl Iterator<Item = Topic> + '_ {
        self.topics.iter().map(|(t, _)| *t)
    }

    #[must_use]
    pub fn faults(&self) -> &[TopicFault] {
        &self.faults
    }

    /// Whether the given topic was emitted in its degraded shape
    #[must_use]
    pub fn is_degraded(&self, topic: Topic) -> bool {
        !self.source_available || self.faults.iter().any(|f| f.topic == topic)
    }

    /// Serialize to a JSON value keyed by topic keyword
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for FinalResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.topics.len()))?;
        for (topic, result) in &self.topics {
            map.serialize_entry(topic.keyword(), result)?;
        }
        map.end()
    }
}
