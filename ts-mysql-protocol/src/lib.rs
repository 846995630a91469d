// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! MySQL Protocol Result Set Encoding
//!
//! This crate implements the server-side half of the MySQL text protocol
//! needed to answer queries:
//! - Packet framing and length-encoded values
//! - Field descriptor derivation and encoding
//! - Result set building and writing over a client connection

pub mod constants;
pub mod packet;
pub mod field;
pub mod resultset;
pub mod conn;

pub use conn::{ClientConn, AFFECTED_ROWS_NOT_APPLICABLE};
pub use field::{format_field, Field};
pub use packet::{Packet, PacketHeader};
pub use resultset::{build_resultset, raw_value, Resultset};
