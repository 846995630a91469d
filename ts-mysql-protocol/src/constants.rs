// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! MySQL Protocol Constants

// Packet headers
pub const OK_HEADER: u8 = 0x00;
pub const EOF_HEADER: u8 = 0xFE;
pub const ERR_HEADER: u8 = 0xFF;

/// Marker for a NULL value in a text protocol row
pub const NULL_VALUE: u8 = 0xFB;

// Capability flags
pub const CLIENT_LONG_PASSWORD: u32 = 0x00000001;
pub const CLIENT_FOUND_ROWS: u32 = 0x00000002;
pub const CLIENT_LONG_FLAG: u32 = 0x00000004;
pub const CLIENT_CONNECT_WITH_DB: u32 = 0x00000008;
pub const CLIENT_PROTOCOL_41: u32 = 0x00000200;
pub const CLIENT_TRANSACTIONS: u32 = 0x00002000;
pub const CLIENT_SECURE_CONNECTION: u32 = 0x00008000;

// Default server capabilities
pub const DEFAULT_CAPABILITY_FLAGS: u32 = CLIENT_LONG_PASSWORD
    | CLIENT_FOUND_ROWS
    | CLIENT_LONG_FLAG
    | CLIENT_CONNECT_WITH_DB
    | CLIENT_PROTOCOL_41
    | CLIENT_TRANSACTIONS
    | CLIENT_SECURE_CONNECTION;

// Character sets
pub const UTF8_CHARSET: u16 = 33;
pub const BINARY_CHARSET: u16 = 63;

// Status flags
pub const SERVER_STATUS_IN_TRANS: u16 = 0x0001;
pub const SERVER_STATUS_AUTOCOMMIT: u16 = 0x0002;
pub const SERVER_MORE_RESULTS_EXISTS: u16 = 0x0008;
pub const SERVER_STATUS_NO_GOOD_INDEX_USED: u16 = 0x0010;
pub const SERVER_STATUS_NO_INDEX_USED: u16 = 0x0020;
pub const SERVER_STATUS_CURSOR_EXISTS: u16 = 0x0040;
pub const SERVER_STATUS_LAST_ROW_SENT: u16 = 0x0080;

// Column types
pub const MYSQL_TYPE_DECIMAL: u8 = 0x00;
pub const MYSQL_TYPE_TINY: u8 = 0x01;
pub const MYSQL_TYPE_SHORT: u8 = 0x02;
pub const MYSQL_TYPE_LONG: u8 = 0x03;
pub const MYSQL_TYPE_FLOAT: u8 = 0x04;
pub const MYSQL_TYPE_DOUBLE: u8 = 0x05;
pub const MYSQL_TYPE_NULL: u8 = 0x06;
pub const MYSQL_TYPE_TIMESTAMP: u8 = 0x07;
pub const MYSQL_TYPE_LONGLONG: u8 = 0x08;
pub const MYSQL_TYPE_INT24: u8 = 0x09;
pub const MYSQL_TYPE_DATE: u8 = 0x0A;
pub const MYSQL_TYPE_TIME: u8 = 0x0B;
pub const MYSQL_TYPE_DATETIME: u8 = 0x0C;
pub const MYSQL_TYPE_YEAR: u8 = 0x0D;
pub const MYSQL_TYPE_NEWDATE: u8 = 0x0E;
pub const MYSQL_TYPE_VARCHAR: u8 = 0x0F;
pub const MYSQL_TYPE_BIT: u8 = 0x10;
pub const MYSQL_TYPE_JSON: u8 = 0xF5;
pub const MYSQL_TYPE_NEWDECIMAL: u8 = 0xF6;
pub const MYSQL_TYPE_ENUM: u8 = 0xF7;
pub const MYSQL_TYPE_SET: u8 = 0xF8;
pub const MYSQL_TYPE_TINY_BLOB: u8 = 0xF9;
pub const MYSQL_TYPE_MEDIUM_BLOB: u8 = 0xFA;
pub const MYSQL_TYPE_LONG_BLOB: u8 = 0xFB;
pub const MYSQL_TYPE_BLOB: u8 = 0xFC;
pub const MYSQL_TYPE_VAR_STRING: u8 = 0xFD;
pub const MYSQL_TYPE_STRING: u8 = 0xFE;
pub const MYSQL_TYPE_GEOMETRY: u8 = 0xFF;

// Column flags
pub const NOT_NULL_FLAG: u16 = 0x0001;
pub const PRI_KEY_FLAG: u16 = 0x0002;
pub const UNIQUE_KEY_FLAG: u16 = 0x0004;
pub const MULTIPLE_KEY_FLAG: u16 = 0x0008;
pub const BLOB_FLAG: u16 = 0x0010;
pub const UNSIGNED_FLAG: u16 = 0x0020;
pub const ZEROFILL_FLAG: u16 = 0x0040;
pub const BINARY_FLAG: u16 = 0x0080;
pub const ENUM_FLAG: u16 = 0x0100;
pub const AUTO_INCREMENT_FLAG: u16 = 0x0200;
pub const TIMESTAMP_FLAG: u16 = 0x0400;
pub const SET_FLAG: u16 = 0x0800;

/// Collation name to collation (charset) id, as sent in column definitions
const COLLATIONS: &[(&str, u16)] = &[
    ("big5_chinese_ci", 1),
    ("latin2_czech_cs", 2),
    ("dec8_swedish_ci", 3),
    ("cp850_general_ci", 4),
    ("latin1_german1_ci", 5),
    ("hp8_english_ci", 6),
    ("koi8r_general_ci", 7),
    ("latin1_swedish_ci", 8),
    ("latin2_general_ci", 9),
    ("swe7_swedish_ci", 10),
    ("ascii_general_ci", 11),
    ("ujis_japanese_ci", 12),
    ("sjis_japanese_ci", 13),
    ("cp1251_bulgarian_ci", 14),
    ("latin1_danish_ci", 15),
    ("hebrew_general_ci", 16),
    ("tis620_thai_ci", 18),
    ("euckr_korean_ci", 19),
    ("latin7_estonian_cs", 20),
    ("latin2_hungarian_ci", 21),
    ("koi8u_general_ci", 22),
    ("cp1251_ukrainian_ci", 23),
    ("gb2312_chinese_ci", 24),
    ("greek_general_ci", 25),
    ("cp1250_general_ci", 26),
    ("latin2_croatian_ci", 27),
    ("gbk_chinese_ci", 28),
    ("cp1257_lithuanian_ci", 29),
    ("latin5_turkish_ci", 30),
    ("latin1_german2_ci", 31),
    ("armscii8_general_ci", 32),
    ("utf8_general_ci", 33),
    ("cp1250_czech_cs", 34),
    ("ucs2_general_ci", 35),
    ("cp866_general_ci", 36),
    ("keybcs2_general_ci", 37),
    ("macce_general_ci", 38),
    ("macroman_general_ci", 39),
    ("cp852_general_ci", 40),
    ("latin7_general_ci", 41),
    ("latin7_general_cs", 42),
    ("macce_bin", 43),
    ("cp1250_croatian_ci", 44),
    ("utf8mb4_general_ci", 45),
    ("utf8mb4_bin", 46),
    ("latin1_bin", 47),
    ("latin1_general_ci", 48),
    ("latin1_general_cs", 49),
    ("cp1251_bin", 50),
    ("cp1251_general_ci", 51),
    ("cp1251_general_cs", 52),
    ("macroman_bin", 53),
    ("utf16_general_ci", 54),
    ("utf16_bin", 55),
    ("cp1256_general_ci", 57),
    ("cp1257_bin", 58),
    ("cp1257_general_ci", 59),
    ("utf32_general_ci", 60),
    ("utf32_bin", 61),
    ("binary", 63),
    ("armscii8_bin", 64),
    ("ascii_bin", 65),
    ("cp1250_bin", 66),
    ("cp1256_bin", 67),
    ("cp866_bin", 68),
    ("dec8_bin", 69),
    ("greek_bin", 70),
    ("hebrew_bin", 71),
    ("hp8_bin", 72),
    ("keybcs2_bin", 73),
    ("koi8r_bin", 74),
    ("koi8u_bin", 75),
    ("latin2_bin", 77),
    ("latin5_bin", 78),
    ("latin7_bin", 79),
    ("cp850_bin", 80),
    ("cp852_bin", 81),
    ("swe7_bin", 82),
    ("utf8_bin", 83),
    ("big5_bin", 84),
    ("euckr_bin", 85),
    ("gb2312_bin", 86),
    ("gbk_bin", 87),
    ("sjis_bin", 88),
    ("tis620_bin", 89),
    ("ucs2_bin", 90),
    ("ujis_bin", 91),
    ("geostd8_general_ci", 92),
    ("geostd8_bin", 93),
    ("latin1_spanish_ci", 94),
    ("cp932_japanese_ci", 95),
    ("cp932_bin", 96),
    ("eucjpms_japanese_ci", 97),
    ("eucjpms_bin", 98),
    ("cp1250_polish_ci", 99),
    ("utf8_unicode_ci", 192),
    ("utf8_general_mysql500_ci", 223),
    ("utf8mb4_unicode_ci", 224),
    ("utf8mb4_0900_ai_ci", 255),
];

/// Look up the collation id for a collation name
pub fn collation_id(name: &str) -> Option<u16> {
    COLLATIONS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, id)| *id)
}

/// Display length MySQL reports for a column of the given type
pub fn default_column_length(column_type: u8) -> u32 {
    match column_type {
        MYSQL_TYPE_TINY => 4,
        MYSQL_TYPE_SHORT => 6,
        MYSQL_TYPE_INT24 => 9,
        MYSQL_TYPE_LONG => 11,
        MYSQL_TYPE_LONGLONG => 20,
        MYSQL_TYPE_FLOAT => 12,
        MYSQL_TYPE_DOUBLE => 22,
        MYSQL_TYPE_YEAR => 4,
        MYSQL_TYPE_DATE | MYSQL_TYPE_NEWDATE => 10,
        MYSQL_TYPE_TIME => 10,
        MYSQL_TYPE_DATETIME | MYSQL_TYPE_TIMESTAMP => 19,
        MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL => 66,
        MYSQL_TYPE_TINY_BLOB => 255,
        MYSQL_TYPE_BLOB | MYSQL_TYPE_JSON => 65535,
        MYSQL_TYPE_MEDIUM_BLOB => 16777215,
        MYSQL_TYPE_LONG_BLOB => 4294967295,
        _ => 255,
    }
}

/// True for integer wire types
pub fn is_integer_type(column_type: u8) -> bool {
    matches!(
        column_type,
        MYSQL_TYPE_TINY
            | MYSQL_TYPE_SHORT
            | MYSQL_TYPE_INT24
            | MYSQL_TYPE_LONG
            | MYSQL_TYPE_LONGLONG
            | MYSQL_TYPE_YEAR
    )
}
