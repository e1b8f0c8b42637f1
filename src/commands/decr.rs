use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::incr::{count_response, parse_counter_request};
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

/// As increment, but subtracting; the counter stops at zero instead of
/// wrapping.
#[derive(Debug, PartialEq)]
pub struct Decrement {
    pub key: Bytes,
    pub delta: u64,
    pub initial: u64,
    pub expiration: u32,
    pub quiet: bool,
}

impl Decrement {
    fn opcode(&self) -> Opcode {
        if self.quiet {
            Opcode::DecrementQ
        } else {
            Opcode::Decrement
        }
    }
}

impl Executable for Decrement {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        let opcode = self.opcode().into();
        let result =
            store
                .lock()
                .unwrap()
                .decrement(&self.key, self.delta, self.initial, self.expiration);

        match result {
            Ok(_) if self.quiet => Ok(vec![]),
            Ok((count, cas)) => Ok(vec![count_response(opcode, count, cas)]),
            Err(err) => Ok(vec![Response::error(opcode, err.into())]),
        }
    }
}

impl TryFrom<&mut RequestParser> for Decrement {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        let (key, delta, initial, expiration) = parse_counter_request(parser)?;

        Ok(Decrement {
            key,
            delta,
            initial,
            expiration,
            quiet: parser.opcode() == Opcode::DecrementQ,
        })
    }
}
