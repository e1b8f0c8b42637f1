use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

/// Store a value only if the key is already live.
#[derive(Debug, PartialEq)]
pub struct Replace {
    pub key: Bytes,
    pub value: Bytes,
    pub flags: u32,
    pub expiration: u32,
    pub quiet: bool,
}

impl Replace {
    fn opcode(&self) -> Opcode {
        if self.quiet {
            Opcode::ReplaceQ
        } else {
            Opcode::Replace
        }
    }
}

impl Executable for Replace {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        let opcode = self.opcode().into();
        let result =
            store
                .lock()
                .unwrap()
                .replace(&self.key, self.value, self.flags, self.expiration);

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

impl TryFrom<&mut RequestParser> for Replace {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        let flags = parser.next_u32()?;
        let expiration = parser.next_u32()?;
        let key = parser.key()?;
        parser.finish()?;

        Ok(Replace {
            key,
            value: parser.value(),
            flags,
            expiration,
            quiet: parser.opcode() == Opcode::ReplaceQ,
        })
    }
}
