use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

/// Report engine statistics as a stream of key/value responses closed by
/// an empty-key terminator. The optional key naming a statistics group is
/// accepted and ignored.
#[derive(Debug, PartialEq)]
pub struct Stat {
    pub key: Bytes,
}

impl Executable for Stat {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        let opcode = Opcode::Stat.into();
        let stats = store.lock().unwrap().stats();

        let mut responses: Vec<Response> = stats
            .into_iter()
            .map(|(name, value)| Response {
                key: Bytes::from(name),
                value: Bytes::from(value),
                ..Response::new(opcode)
            })
            .collect();

        responses.push(Response::new(opcode));
        Ok(responses)
    }
}

impl TryFrom<&mut RequestParser> for Stat {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        let key = parser.optional_key();
        parser.no_value()?;
        parser.finish()?;

        Ok(Stat { key })
    }
}
