//! Wire-level message definitions for the complaint feed.

use serde::{Deserialize, Serialize};

use crate::domain::ports::ComplaintListing;
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::complaints::MyComplaintsResponse;

/// Frames the server pushes to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// The student's full complaint list, sent on connect and after every
    /// change to the complaints collection.
    Snapshot(MyComplaintsResponse),
    /// A snapshot could not be read; the connection stays open.
    Error { code: ErrorCode, message: String },
}

impl From<ComplaintListing> for ServerMessage {
    fn from(value: ComplaintListing) -> Self {
        Self::Snapshot(value.into())
    }
}

impl From<&Error> for ServerMessage {
    fn from(value: &Error) -> Self {
        Self::Error {
            code: value.code(),
            message: value.message().to_owned(),
        }
    }
}

/// Frames the client may send.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Ask for a fresh snapshot without waiting for a change.
    Refresh,
}
