// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Error types for the tablet server query core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabletError {
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("unsupported type {0} for resultset")]
    UnsupportedType(String),

    #[error("row {row} has {columns} column not equal {fields}")]
    ColumnCountMismatch {
        row: usize,
        columns: usize,
        fields: usize,
    },

    #[error("Metadata error: {0}")]
    MetadataError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Schema manager is closed")]
    Closed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TabletError {
    /// True for failures that leave a client connection in an unknown state.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            TabletError::IoError(_) | TabletError::ConnectionClosed | TabletError::NetworkError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TabletError>;
