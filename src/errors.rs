// Error types for pitwall

use crate::dashboard::ViewModel;
use snafu::Snafu;
use std::{io, sync::mpsc::SendError};

#[derive(Debug, Snafu)]
pub enum PitwallError {
    // Errors for the stats API client
    #[snafu(display("Could not construct the stats API client"))]
    StatsClientError { source: reqwest::Error },
    #[snafu(display("Stats API request failed"))]
    StatsRequestError { source: reqwest::Error },
    #[snafu(display("Stats API returned an unusable payload"))]
    MalformedStatsPayload { source: reqwest::Error },
    #[snafu(display("Stats provider error"))]
    StatsProviderError { description: String },

    // Errors while broadcasting dashboard snapshots
    #[snafu(display("Error broadcasting dashboard snapshot"))]
    SnapshotBroadcastError {
        source: Box<SendError<ViewModel>>,
    },

    // Errors for the snapshot writer
    #[snafu(display("Error writing snapshot file"))]
    WriterError { source: io::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // UI errors
    #[snafu(display("Invalid snapshot file: {path}"))]
    InvalidSnapshotFile { path: String },
    #[snafu(display("Error loading snapshot file"))]
    SnapshotLoaderError { source: io::Error },
}

impl From<SendError<ViewModel>> for PitwallError {
    fn from(value: SendError<ViewModel>) -> Self {
        PitwallError::SnapshotBroadcastError {
            source: Box::new(value),
        }
    }
}
