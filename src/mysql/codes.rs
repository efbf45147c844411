//! Wire-level type codes, column flags and character sets.

/// Column type codes from the MySQL client/server protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MySqlType {
    Decimal = 0,
    Tiny = 1,
    Short = 2,
    Long = 3,
    Float = 4,
    Double = 5,
    Null = 6,
    Timestamp = 7,
    LongLong = 8,
    Int24 = 9,
    Date = 10,
    Time = 11,
    DateTime = 12,
    Year = 13,
    NewDate = 14,
    VarChar = 15,
    Bit = 16,
    Json = 245,
    NewDecimal = 246,
    Enum = 247,
    Set = 248,
    TinyBlob = 249,
    MediumBlob = 250,
    LongBlob = 251,
    Blob = 252,
    VarString = 253,
    String = 254,
    Geometry = 255,
}

impl MySqlType {
    /// Look up a wire code; `None` for codes this adapter does not know.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        let ty = match code {
            0 => Self::Decimal,
            1 => Self::Tiny,
            2 => Self::Short,
            3 => Self::Long,
            4 => Self::Float,
            5 => Self::Double,
            6 => Self::Null,
            7 => Self::Timestamp,
            8 => Self::LongLong,
            9 => Self::Int24,
            10 => Self::Date,
            11 => Self::Time,
            12 => Self::DateTime,
            13 => Self::Year,
            14 => Self::NewDate,
            15 => Self::VarChar,
            16 => Self::Bit,
            245 => Self::Json,
            246 => Self::NewDecimal,
            247 => Self::Enum,
            248 => Self::Set,
            249 => Self::TinyBlob,
            250 => Self::MediumBlob,
            251 => Self::LongBlob,
            252 => Self::Blob,
            253 => Self::VarString,
            254 => Self::String,
            255 => Self::Geometry,
            _ => return None,
        };
        Some(ty)
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Protocol name, as the native client reports it.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Decimal => "DECIMAL",
            Self::Tiny => "TINY",
            Self::Short => "SHORT",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Null => "NULL",
            Self::Timestamp => "TIMESTAMP",
            Self::LongLong => "LONGLONG",
            Self::Int24 => "INT24",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::DateTime => "DATETIME",
            Self::Year => "YEAR",
            Self::NewDate => "NEWDATE",
            Self::VarChar => "VARCHAR",
            Self::Bit => "BIT",
            Self::Json => "JSON",
            Self::NewDecimal => "NEWDECIMAL",
            Self::Enum => "ENUM",
            Self::Set => "SET",
            Self::TinyBlob => "TINY_BLOB",
            Self::MediumBlob => "MEDIUM_BLOB",
            Self::LongBlob => "LONG_BLOB",
            Self::Blob => "BLOB",
            Self::VarString => "VAR_STRING",
            Self::String => "STRING",
            Self::Geometry => "GEOMETRY",
        }
    }

    /// Name for a raw code, `"Unknown"` when unrecognized.
    #[must_use]
    pub fn name_of(code: u8) -> &'static str {
        Self::from_code(code).map_or("Unknown", Self::name)
    }
}

/// Column definition flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnFlags(pub u16);

impl ColumnFlags {
    pub const NOT_NULL: u16 = 1;
    pub const PRI_KEY: u16 = 2;
    pub const UNIQUE_KEY: u16 = 4;
    pub const MULTIPLE_KEY: u16 = 8;
    pub const BLOB: u16 = 16;
    pub const UNSIGNED: u16 = 32;
    pub const ZEROFILL: u16 = 64;
    pub const BINARY: u16 = 128;
    pub const ENUM: u16 = 256;
    pub const AUTO_INCREMENT: u16 = 512;
    pub const TIMESTAMP: u16 = 1024;
    pub const SET: u16 = 2048;
    pub const NO_DEFAULT_VALUE: u16 = 4096;
    pub const ON_UPDATE_NOW: u16 = 8192;
    pub const NUM: u16 = 32768;

    #[must_use]
    pub fn contains(self, flag: u16) -> bool {
        self.0 & flag != 0
    }
}

/// Character set id the server reports for binary (non-text) columns.
pub const BINARY_CHARSET: u16 = 63;
