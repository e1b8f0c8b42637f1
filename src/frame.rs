// https://github.com/memcached/memcached/wiki/BinaryProtocolRevamped

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error as ThisError;

/// Fixed header size shared by requests and responses.
pub const HEADER_SIZE: usize = 24;

/// Hard cap on the advertised total body length. The protocol field is 32
/// bits wide; anything past this is treated as a framing error rather than
/// buffered.
pub const MAX_BODY_SIZE: usize = 8 * 1024 * 1024;

pub const REQUEST_MAGIC: u8 = 0x80;
pub const RESPONSE_MAGIC: u8 = 0x81;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("not enough data is available to parse an entire message")]
    Incomplete,
    #[error("invalid magic byte: {0:#04x}")]
    InvalidMagic(u8),
    #[error("extras and key lengths exceed the total body length")]
    InvalidBodyLength,
    #[error("total body length {0} exceeds the maximum message size")]
    BodyTooLarge(usize),
    #[error("invalid response status: {0:#06x}")]
    InvalidStatus(u16),
}

/// One framed request: 24-byte header followed by extras, key and value.
/// The opcode is kept raw so unknown commands can still be answered with
/// an `UnknownCommand` status instead of dropping the connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub opcode: u8,
    pub opaque: u32,
    pub cas: u64,
    pub extras: Bytes,
    pub key: Bytes,
    pub value: Bytes,
}

impl Request {
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Request, Error> {
        if src.remaining() < HEADER_SIZE {
            return Err(Error::Incomplete);
        }

        let magic = src.get_u8();
        if magic != REQUEST_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let opcode = src.get_u8();
        let key_len = src.get_u16() as usize;
        let extras_len = src.get_u8() as usize;
        let _data_type = src.get_u8();
        let _reserved = src.get_u16();
        let body_len = src.get_u32() as usize;
        let opaque = src.get_u32();
        let cas = src.get_u64();

        let (extras, key, value) = parse_body(src, extras_len, key_len, body_len)?;

        Ok(Request {
            opcode,
            opaque,
            cas,
            extras,
            key,
            value,
        })
    }

    pub fn write(&self, dst: &mut BytesMut) {
        let body_len = self.extras.len() + self.key.len() + self.value.len();
        dst.reserve(HEADER_SIZE + body_len);

        dst.put_u8(REQUEST_MAGIC);
        dst.put_u8(self.opcode);
        dst.put_u16(self.key.len() as u16);
        dst.put_u8(self.extras.len() as u8);
        dst.put_u8(0); // data type
        dst.put_u16(0); // reserved
        dst.put_u32(body_len as u32);
        dst.put_u32(self.opaque);
        dst.put_u64(self.cas);
        dst.put_slice(&self.extras);
        dst.put_slice(&self.key);
        dst.put_slice(&self.value);
    }
}

/// One framed response. Error statuses carry their human-readable message
/// as the value payload, which binary clients surface verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub opcode: u8,
    pub status: Status,
    pub opaque: u32,
    pub cas: u64,
    pub extras: Bytes,
    pub key: Bytes,
    pub value: Bytes,
}

impl Response {
    /// An empty success response for the given opcode.
    pub fn new(opcode: u8) -> Response {
        Response {
            opcode,
            status: Status::NoError,
            opaque: 0,
            cas: 0,
            extras: Bytes::new(),
            key: Bytes::new(),
            value: Bytes::new(),
        }
    }

    /// An error response whose body is the status message text.
    pub fn error(opcode: u8, status: Status) -> Response {
        Response {
            value: Bytes::from(status.message()),
            status,
            ..Response::new(opcode)
        }
    }

    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Response, Error> {
        if src.remaining() < HEADER_SIZE {
            return Err(Error::Incomplete);
        }

        let magic = src.get_u8();
        if magic != RESPONSE_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let opcode = src.get_u8();
        let key_len = src.get_u16() as usize;
        let extras_len = src.get_u8() as usize;
        let _data_type = src.get_u8();
        let status = Status::try_from(src.get_u16())?;
        let body_len = src.get_u32() as usize;
        let opaque = src.get_u32();
        let cas = src.get_u64();

        let (extras, key, value) = parse_body(src, extras_len, key_len, body_len)?;

        Ok(Response {
            opcode,
            status,
            opaque,
            cas,
            extras,
            key,
            value,
        })
    }

    pub fn write(&self, dst: &mut BytesMut) {
        let body_len = self.extras.len() + self.key.len() + self.value.len();
        dst.reserve(HEADER_SIZE + body_len);

        dst.put_u8(RESPONSE_MAGIC);
        dst.put_u8(self.opcode);
        dst.put_u16(self.key.len() as u16);
        dst.put_u8(self.extras.len() as u8);
        dst.put_u8(0); // data type
        dst.put_u16(self.status as u16);
        dst.put_u32(body_len as u32);
        dst.put_u32(self.opaque);
        dst.put_u64(self.cas);
        dst.put_slice(&self.extras);
        dst.put_slice(&self.key);
        dst.put_slice(&self.value);
    }
}

fn parse_body(
    src: &mut Cursor<&[u8]>,
    extras_len: usize,
    key_len: usize,
    body_len: usize,
) -> Result<(Bytes, Bytes, Bytes), Error> {
    if body_len > MAX_BODY_SIZE {
        return Err(Error::BodyTooLarge(body_len));
    }
    if extras_len + key_len > body_len {
        return Err(Error::InvalidBodyLength);
    }
    if src.remaining() < body_len {
        return Err(Error::Incomplete);
    }

    let mut body = src.copy_to_bytes(body_len);
    let extras = body.split_to(extras_len);
    let key = body.split_to(key_len);

    Ok((extras, key, body))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Get = 0x00,
    Set = 0x01,
    Add = 0x02,
    Replace = 0x03,
    Delete = 0x04,
    Increment = 0x05,
    Decrement = 0x06,
    Quit = 0x07,
    Flush = 0x08,
    GetQ = 0x09,
    Noop = 0x0a,
    Version = 0x0b,
    GetK = 0x0c,
    GetKQ = 0x0d,
    Append = 0x0e,
    Prepend = 0x0f,
    Stat = 0x10,
    SetQ = 0x11,
    AddQ = 0x12,
    ReplaceQ = 0x13,
    DeleteQ = 0x14,
    IncrementQ = 0x15,
    DecrementQ = 0x16,
    QuitQ = 0x17,
    FlushQ = 0x18,
    AppendQ = 0x19,
    PrependQ = 0x1a,
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x00 => Ok(Self::Get),
            0x01 => Ok(Self::Set),
            0x02 => Ok(Self::Add),
            0x03 => Ok(Self::Replace),
            0x04 => Ok(Self::Delete),
            0x05 => Ok(Self::Increment),
            0x06 => Ok(Self::Decrement),
            0x07 => Ok(Self::Quit),
            0x08 => Ok(Self::Flush),
            0x09 => Ok(Self::GetQ),
            0x0a => Ok(Self::Noop),
            0x0b => Ok(Self::Version),
            0x0c => Ok(Self::GetK),
            0x0d => Ok(Self::GetKQ),
            0x0e => Ok(Self::Append),
            0x0f => Ok(Self::Prepend),
            0x10 => Ok(Self::Stat),
            0x11 => Ok(Self::SetQ),
            0x12 => Ok(Self::AddQ),
            0x13 => Ok(Self::ReplaceQ),
            0x14 => Ok(Self::DeleteQ),
            0x15 => Ok(Self::IncrementQ),
            0x16 => Ok(Self::DecrementQ),
            0x17 => Ok(Self::QuitQ),
            0x18 => Ok(Self::FlushQ),
            0x19 => Ok(Self::AppendQ),
            0x1a => Ok(Self::PrependQ),
            byte => Err(byte),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NoError = 0x0000,
    KeyNotFound = 0x0001,
    KeyExists = 0x0002,
    ValueTooLarge = 0x0003,
    InvalidArguments = 0x0004,
    ItemNotStored = 0x0005,
    NonNumericValue = 0x0006,
    UnknownCommand = 0x0081,
    OutOfMemory = 0x0082,
}

impl Status {
    /// Message text sent as the body of error responses. The "Key exists"
    /// and "Key not found" strings are part of the observable contract.
    pub fn message(&self) -> &'static str {
        match self {
            Status::NoError => "",
            Status::KeyNotFound => "Key not found",
            Status::KeyExists => "Key exists",
            Status::ValueTooLarge => "Value too large",
            Status::InvalidArguments => "Invalid arguments",
            Status::ItemNotStored => "Not stored",
            Status::NonNumericValue => "Non-numeric server-side value for incr or decr",
            Status::UnknownCommand => "Unknown command",
            Status::OutOfMemory => "Out of memory",
        }
    }
}

impl TryFrom<u16> for Status {
    type Error = Error;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            0x0000 => Ok(Self::NoError),
            0x0001 => Ok(Self::KeyNotFound),
            0x0002 => Ok(Self::KeyExists),
            0x0003 => Ok(Self::ValueTooLarge),
            0x0004 => Ok(Self::InvalidArguments),
            0x0005 => Ok(Self::ItemNotStored),
            0x0006 => Ok(Self::NonNumericValue),
            0x0081 => Ok(Self::UnknownCommand),
            0x0082 => Ok(Self::OutOfMemory),
            code => Err(Error::InvalidStatus(code)),
        }
    }
}
