// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Result set building and writing over a client connection

use std::io::Cursor;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;
use ts_common::{TableColumn, TabletError, Value};
use ts_mysql_protocol::constants::*;
use ts_mysql_protocol::packet::{read_lenenc_int, read_lenenc_string};
use ts_mysql_protocol::{build_resultset, ClientConn, Packet, Resultset, AFFECTED_ROWS_NOT_APPLICABLE};

fn user_columns() -> Vec<TableColumn> {
    vec![
        TableColumn::new("id", MYSQL_TYPE_LONGLONG).not_null(),
        TableColumn::new("name", MYSQL_TYPE_VARCHAR).with_collation("utf8_general_ci"),
        TableColumn::new("score", MYSQL_TYPE_DOUBLE),
    ]
}

fn parse_packets(buf: Vec<u8>) -> Vec<Packet> {
    let len = buf.len() as u64;
    let mut cursor = Cursor::new(buf);
    let mut packets = Vec::new();
    while cursor.position() < len {
        packets.push(Packet::read_from(&mut cursor).expect("valid packet"));
    }
    packets
}

async fn write(rs: &Resultset, status: u16) -> (Vec<Packet>, i64) {
    let mut conn = ClientConn::new(Vec::new(), 42);
    conn.set_sequence_id(1);
    conn.write_resultset(status, rs).await.expect("write succeeds");
    let affected = conn.affected_rows();
    (parse_packets(conn.into_inner()), affected)
}

/// Writer that fails once it has accepted `budget` writes
struct FailingWriter {
    budget: usize,
    written: Vec<u8>,
}

impl AsyncWrite for FailingWriter {
    fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        if self.budget == 0 {
            return Poll::Ready(Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "peer gone")));
        }
        self.budget -= 1;
        self.written.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn test_single_row_round_trip() {
    let rows = vec![vec![Value::Int64(7), Value::from("alice"), Value::Null]];
    let rs = build_resultset(&user_columns(), &rows).unwrap();

    let (packets, affected) = write(&rs, SERVER_STATUS_AUTOCOMMIT).await;
    assert_eq!(affected, AFFECTED_ROWS_NOT_APPLICABLE);
    assert_eq!(packets.len(), 1 + 3 + 1 + 1 + 1);

    // Column count
    let mut count = Cursor::new(packets[0].payload.clone());
    assert_eq!(read_lenenc_int(&mut count).unwrap(), 3);

    // Field names in order
    let names: Vec<Vec<u8>> = packets[1..4]
        .iter()
        .map(|p| {
            let mut c = Cursor::new(p.payload.clone());
            for _ in 0..4 {
                read_lenenc_string(&mut c).unwrap();
            }
            read_lenenc_string(&mut c).unwrap()
        })
        .collect();
    assert_eq!(names, vec![b"id".to_vec(), b"name".to_vec(), b"score".to_vec()]);

    // EOF carries the status flags
    assert!(packets[4].is_eof());
    assert_eq!(u16::from_le_bytes([packets[4].payload[3], packets[4].payload[4]]), SERVER_STATUS_AUTOCOMMIT);

    // Row: "7", "alice", NULL
    let row = &packets[5].payload;
    let mut c = Cursor::new(row.clone());
    assert_eq!(read_lenenc_string(&mut c).unwrap(), b"7");
    assert_eq!(read_lenenc_string(&mut c).unwrap(), b"alice");
    assert_eq!(row[c.position() as usize], NULL_VALUE);

    assert!(packets[6].is_eof());

    // Sequence ids are consecutive
    for (i, p) in packets.iter().enumerate() {
        assert_eq!(p.sequence_id as usize, i + 1);
    }
}

#[tokio::test]
async fn test_packet_count_for_various_shapes() {
    for (ncols, nrows) in [(0usize, 0usize), (1, 0), (2, 5), (4, 1)] {
        let columns: Vec<TableColumn> = (0..ncols)
            .map(|i| TableColumn::new(format!("c{}", i), MYSQL_TYPE_LONGLONG))
            .collect();
        let rows: Vec<Vec<Value>> = (0..nrows)
            .map(|r| (0..ncols).map(|c| Value::Int64((r * c) as i64)).collect())
            .collect();

        let rs = build_resultset(&columns, &rows).unwrap();
        let (packets, _) = write(&rs, 0).await;
        assert_eq!(packets.len(), 1 + ncols + 1 + nrows + 1, "cols={} rows={}", ncols, nrows);
    }
}

#[tokio::test]
async fn test_write_failure_aborts_sequence() {
    let rows = vec![vec![Value::Int64(1), Value::from("a"), Value::Float64(0.5)]];
    let rs = build_resultset(&user_columns(), &rows).unwrap();

    // Each packet is a header write plus a payload write; allow count + 1 field
    let writer = FailingWriter { budget: 4, written: Vec::new() };
    let mut conn = ClientConn::new(writer, 7);
    let err = conn.write_resultset(0, &rs).await.unwrap_err();

    assert!(matches!(err, TabletError::IoError(_)));
    assert_eq!(conn.affected_rows(), AFFECTED_ROWS_NOT_APPLICABLE);

    let packets = parse_packets(conn.into_inner().written);
    assert_eq!(packets.len(), 2);
}

#[test]
fn test_mismatched_row_rejected() {
    let rows = vec![
        vec![Value::Int64(1), Value::from("a"), Value::Null],
        vec![Value::Int64(2)],
    ];
    let err = build_resultset(&user_columns(), &rows).unwrap_err();
    assert_eq!(err.to_string(), "row 1 has 1 column not equal 3");
}

#[test]
fn test_unknown_collation_keeps_value_charset() {
    let columns = vec![TableColumn::new("name", MYSQL_TYPE_VARCHAR).with_collation("klingon_ci")];
    let rs = build_resultset(&columns, &[vec![Value::from("x")]]).unwrap();
    assert_eq!(rs.fields[0].charset, UTF8_CHARSET);
}
