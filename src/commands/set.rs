use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

/// Store a value unconditionally, or conditionally when the request
/// carries a non-zero version (compare-and-swap).
///
/// Ref: <https://github.com/memcached/memcached/wiki/BinaryProtocolRevamped#set-add-replace>
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: Bytes,
    pub value: Bytes,
    pub flags: u32,
    pub expiration: u32,
    pub cas: u64,
    pub quiet: bool,
}

impl Set {
    fn opcode(&self) -> Opcode {
        if self.quiet {
            Opcode::SetQ
        } else {
            Opcode::Set
        }
    }
}

impl Executable for Set {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        let opcode = self.opcode().into();
        let result = store.lock().unwrap().set(
            &self.key,
            self.value,
            self.flags,
            self.expiration,
            self.cas,
        );

        match result {
            Ok(_) if self.quiet => Ok(vec![]),
            Ok(cas) => Ok(vec![Response {
                cas,
                ..Response::new(opcode)
            }]),
            Err(err) => Ok(vec![Response::error(opcode, err.into())]),
        }
    }
}

impl TryFrom<&mut RequestParser> for Set {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        let flags = parser.next_u32()?;
        let expiration = parser.next_u32()?;
        let key = parser.key()?;
        parser.finish()?;

        Ok(Set {
            key,
            value: parser.value(),
            flags,
            expiration,
            cas: parser.cas(),
            quiet: parser.opcode() == Opcode::SetQ,
        })
    }
}
