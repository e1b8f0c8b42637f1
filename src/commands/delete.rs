use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

#[derive(Debug, PartialEq)]
pub struct Delete {
    pub key: Bytes,
    pub quiet: bool,
}

impl Delete {
    fn opcode(&self) -> Opcode {
        if self.quiet {
            Opcode::DeleteQ
        } else {
            Opcode::Delete
        }
    }
}

impl Executable for Delete {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        let opcode = self.opcode().into();
        let result = store.lock().unwrap().delete(&self.key);

        match result {
            Ok(()) if self.quiet => Ok(vec![]),
            Ok(()) => Ok(vec![Response::new(opcode)]),
            Err(err) => Ok(vec![Response::error(opcode, err.into())]),
        }
    }
}

impl TryFrom<&mut RequestParser> for Delete {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        let key = parser.key()?;
        parser.no_value()?;
        parser.finish()?;

        Ok(Delete {
            key,
            quiet: parser.opcode() == Opcode::DeleteQ,
        })
    }
}
