use bytes::{BufMut, Bytes, BytesMut};
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

/// Add `delta` to the decimal counter stored at `key`, creating it with
/// `initial` when absent (unless the expiration field is all ones). The
/// response body is the resulting count as 8 big-endian bytes.
///
/// Ref: <https://github.com/memcached/memcached/wiki/BinaryProtocolRevamped#increment-decrement>
#[derive(Debug, PartialEq)]
pub struct Increment {
    pub key: Bytes,
    pub delta: u64,
    pub initial: u64,
    pub expiration: u32,
    pub quiet: bool,
}

impl Increment {
    fn opcode(&self) -> Opcode {
        if self.quiet {
            Opcode::IncrementQ
        } else {
            Opcode::Increment
        }
    }
}

impl Executable for Increment {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        let opcode = self.opcode().into();
        let result =
            store
                .lock()
                .unwrap()
                .increment(&self.key, self.delta, self.initial, self.expiration);

        match result {
            Ok(_) if self.quiet => Ok(vec![]),
            Ok((count, cas)) => Ok(vec![count_response(opcode, count, cas)]),
            Err(err) => Ok(vec![Response::error(opcode, err.into())]),
        }
    }
}

impl TryFrom<&mut RequestParser> for Increment {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        let (key, delta, initial, expiration) = parse_counter_request(parser)?;

        Ok(Increment {
            key,
            delta,
            initial,
            expiration,
            quiet: parser.opcode() == Opcode::IncrementQ,
        })
    }
}

/// Shared by increment and decrement: 20 bytes of extras (delta, initial,
/// expiration), a key and no value.
pub(crate) fn parse_counter_request(
    parser: &mut RequestParser,
) -> Result<(Bytes, u64, u64, u32), CommandParserError> {
    let delta = parser.next_u64()?;
    let initial = parser.next_u64()?;
    let expiration = parser.next_u32()?;
    let key = parser.key()?;
    parser.no_value()?;
    parser.finish()?;

    Ok((key, delta, initial, expiration))
}

pub(crate) fn count_response(opcode: u8, count: u64, cas: u64) -> Response {
    let mut value = BytesMut::with_capacity(8);
    value.put_u64(count);

    Response {
        cas,
        value: value.freeze(),
        ..Response::new(opcode)
    }
}
