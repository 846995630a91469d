// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! MySQL Protocol Packet Framing
//!
//! MySQL wire protocol uses this packet format:
//! ```text
//! [3 bytes: payload length]
//! [1 byte: sequence number]
//! [N bytes: payload]
//! ```

use crate::constants::*;
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::{self, Read};

/// MySQL packet header (4 bytes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    pub payload_length: u32,  // Actually 3 bytes (u24)
    pub sequence_id: u8,
}

impl PacketHeader {
    pub const SIZE: usize = 4;
    pub const MAX_PAYLOAD_LEN: u32 = 0xFFFFFF; // 16MB - 1

    /// Header for one packet; larger payloads must be split by the caller
    pub fn new(payload_length: usize, sequence_id: u8) -> io::Result<Self> {
        if payload_length > Self::MAX_PAYLOAD_LEN as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("packet payload of {} bytes exceeds {}", payload_length, Self::MAX_PAYLOAD_LEN),
            ));
        }
        Ok(Self {
            payload_length: payload_length as u32,
            sequence_id,
        })
    }

    /// Read packet header from stream
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let payload_length = reader.read_u24::<LittleEndian>()?;
        let sequence_id = reader.read_u8()?;
        Ok(Self { payload_length, sequence_id })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut header = [0u8; Self::SIZE];
        LittleEndian::write_u24(&mut header[0..3], self.payload_length);
        header[3] = self.sequence_id;
        header
    }
}

/// MySQL packet (header + payload)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub sequence_id: u8,
    pub payload: Vec<u8>,
}

impl Packet {
    pub fn new(sequence_id: u8, payload: Vec<u8>) -> Self {
        Self { sequence_id, payload }
    }

    /// Read a complete packet from stream
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let header = PacketHeader::read_from(reader)?;

        let mut payload = vec![0u8; header.payload_length as usize];
        reader.read_exact(&mut payload)?;

        Ok(Self::new(header.sequence_id, payload))
    }

    pub fn is_eof(&self) -> bool {
        self.payload.first() == Some(&EOF_HEADER) && self.payload.len() < 9
    }
}

pub fn put_u16(buf: &mut Vec<u8>, value: u16) {
    let mut b = [0u8; 2];
    LittleEndian::write_u16(&mut b, value);
    buf.extend_from_slice(&b);
}

pub fn put_u32(buf: &mut Vec<u8>, value: u32) {
    let mut b = [0u8; 4];
    LittleEndian::write_u32(&mut b, value);
    buf.extend_from_slice(&b);
}

/// Write length-encoded integer (MySQL protocol)
pub fn write_lenenc_int(buf: &mut Vec<u8>, value: u64) {
    if value < 251 {
        buf.push(value as u8);
    } else if value < 0x10000 {
        buf.push(0xFC);
        put_u16(buf, value as u16);
    } else if value < 0x1000000 {
        buf.push(0xFD);
        let mut b = [0u8; 3];
        LittleEndian::write_u24(&mut b, value as u32);
        buf.extend_from_slice(&b);
    } else {
        buf.push(0xFE);
        let mut b = [0u8; 8];
        LittleEndian::write_u64(&mut b, value);
        buf.extend_from_slice(&b);
    }
}

/// Write length-encoded string (MySQL protocol)
pub fn write_lenenc_string(buf: &mut Vec<u8>, s: &[u8]) {
    write_lenenc_int(buf, s.len() as u64);
    buf.extend_from_slice(s);
}

/// Read length-encoded integer (MySQL protocol)
pub fn read_lenenc_int<R: Read>(reader: &mut R) -> io::Result<u64> {
    let first_byte = reader.read_u8()?;
    match first_byte {
        0..=250 => Ok(first_byte as u64),
        0xFC => Ok(reader.read_u16::<LittleEndian>()? as u64),
        0xFD => Ok(reader.read_u24::<LittleEndian>()? as u64),
        0xFE => reader.read_u64::<LittleEndian>(),
        _ => Err(io::Error::new(io::ErrorKind::InvalidData, "Invalid length-encoded integer")),
    }
}

/// Read length-encoded string (MySQL protocol)
pub fn read_lenenc_string<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let len = read_lenenc_int(reader)?;
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// OK packet payload
pub fn ok_payload(affected_rows: u64, last_insert_id: u64, status_flags: u16, warnings: u16) -> Vec<u8> {
    let mut payload = vec![OK_HEADER];
    write_lenenc_int(&mut payload, affected_rows);
    write_lenenc_int(&mut payload, last_insert_id);
    put_u16(&mut payload, status_flags);
    put_u16(&mut payload, warnings);
    payload
}

/// ERR packet payload
pub fn err_payload(error_code: u16, sql_state: &str, error_message: &str) -> Vec<u8> {
    let mut payload = vec![ERR_HEADER];
    put_u16(&mut payload, error_code);

    // SQL state marker + state (6 bytes total)
    payload.push(b'#');
    payload.extend_from_slice(sql_state.as_bytes());

    payload.extend_from_slice(error_message.as_bytes());
    payload
}

/// EOF packet payload (Protocol 4.1)
pub fn eof_payload(warnings: u16, status_flags: u16) -> Vec<u8> {
    let mut payload = vec![EOF_HEADER];
    put_u16(&mut payload, warnings);
    put_u16(&mut payload, status_flags);
    payload
}
