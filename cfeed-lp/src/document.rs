//! Fixed change-feed document schema

use cfeed_common::payload::null_as_default;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Change-feed document with the container's system properties
///
/// Only `id` is required; any other field missing from the feed, or sent as
/// `null`, takes its default. Properties outside this schema are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmosDocument {
    pub id: String,
    #[serde(rename = "customerNotes", default, deserialize_with = "null_as_default")]
    pub customer_notes: String,
    #[serde(rename = "_rid", default, deserialize_with = "null_as_default")]
    pub rid: String,
    #[serde(rename = "_self", default, deserialize_with = "null_as_default")]
    pub self_link: String,
    #[serde(rename = "_etag", default, deserialize_with = "null_as_default")]
    pub etag: String,
    #[serde(rename = "_attachments", default, deserialize_with = "null_as_default")]
    pub attachments: String,
    /// Last-modified time, seconds since epoch
    #[serde(rename = "_ts", default, deserialize_with = "null_as_default")]
    pub ts: i64,
    /// Logical sequence number of the change
    #[serde(rename = "_lsn", default, deserialize_with = "null_as_default")]
    pub lsn: i64,
}

impl fmt::Display for CosmosDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id: {}, customerNotes: {}, _rid: {}, _self: {}, _etag: {}, _attachments: {}, _ts: {}, _lsn: {}}}",
            self.id,
            self.customer_notes,
            self.rid,
            self.self_link,
            self.etag,
            self.attachments,
            self.ts,
            self.lsn
        )
    }
}
