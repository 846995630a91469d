// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Client connection writer
//!
//! Frames payloads into MySQL packets with sequence tracking and writes them
//! to any `AsyncWrite`. Wrap the stream in a `tokio::io::BufWriter` when
//! writes should be coalesced until `flush`.

use crate::constants::*;
use crate::packet::{eof_payload, err_payload, ok_payload, write_lenenc_int, PacketHeader};
use crate::resultset::Resultset;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};
use ts_common::Result;

/// Affected-rows value when the last response was a result set
pub const AFFECTED_ROWS_NOT_APPLICABLE: i64 = -1;

pub struct ClientConn<W> {
    writer: W,
    connection_id: u32,
    sequence_id: u8,
    capability: u32,
    affected_rows: i64,
}

impl<W: AsyncWrite + Unpin> ClientConn<W> {
    pub fn new(writer: W, connection_id: u32) -> Self {
        Self {
            writer,
            connection_id,
            sequence_id: 0,
            capability: DEFAULT_CAPABILITY_FLAGS,
            affected_rows: 0,
        }
    }

    pub fn connection_id(&self) -> u32 {
        self.connection_id
    }

    pub fn sequence_id(&self) -> u8 {
        self.sequence_id
    }

    /// Set the next outgoing sequence id (command handlers answer with request id + 1)
    pub fn set_sequence_id(&mut self, sequence_id: u8) {
        self.sequence_id = sequence_id;
    }

    pub fn capability(&self) -> u32 {
        self.capability
    }

    pub fn set_capability(&mut self, capability: u32) {
        self.capability = capability;
    }

    /// Affected rows reported by the last response, `-1` after a result set
    pub fn affected_rows(&self) -> i64 {
        self.affected_rows
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write one logical payload, splitting at the 16 MiB - 1 packet limit.
    ///
    /// A payload that is an exact multiple of the limit is terminated by an
    /// empty packet.
    pub async fn write_packet(&mut self, payload: &[u8]) -> Result<()> {
        let max = PacketHeader::MAX_PAYLOAD_LEN as usize;
        let mut rest = payload;

        loop {
            let len = rest.len().min(max);
            let header = PacketHeader::new(len, self.sequence_id)?;
            self.sequence_id = self.sequence_id.wrapping_add(1);

            self.writer.write_all(&header.to_bytes()).await?;
            self.writer.write_all(&rest[..len]).await?;

            rest = &rest[len..];
            if len < max {
                return Ok(());
            }
        }
    }

    pub async fn write_eof(&mut self, status: u16) -> Result<()> {
        self.write_packet(&eof_payload(0, status)).await
    }

    pub async fn write_ok(&mut self, affected_rows: u64, last_insert_id: u64, status: u16) -> Result<()> {
        self.affected_rows = affected_rows as i64;
        self.write_packet(&ok_payload(affected_rows, last_insert_id, status, 0)).await
    }

    pub async fn write_error(&mut self, code: u16, sql_state: &str, message: &str) -> Result<()> {
        warn!("Connection {} error {} ({}): {}", self.connection_id, code, sql_state, message);
        self.write_packet(&err_payload(code, sql_state, message)).await
    }

    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Send a full text protocol result set and flush.
    ///
    /// Any failed write aborts the sequence; the connection should then be
    /// closed by the caller.
    pub async fn write_resultset(&mut self, status: u16, rs: &Resultset) -> Result<()> {
        self.affected_rows = AFFECTED_ROWS_NOT_APPLICABLE;

        let mut count = Vec::with_capacity(9);
        write_lenenc_int(&mut count, rs.fields.len() as u64);
        self.write_packet(&count).await?;

        for field in &rs.fields {
            self.write_packet(&field.dump()).await?;
        }

        self.write_eof(status).await?;

        for row in &rs.row_datas {
            self.write_packet(row).await?;
        }

        self.write_eof(status).await?;
        self.flush().await?;

        debug!(
            "Connection {} sent resultset: {} columns, {} rows",
            self.connection_id,
            rs.fields.len(),
            rs.row_datas.len()
        );
        Ok(())
    }
}
