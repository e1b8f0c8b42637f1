use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

#[derive(Debug, PartialEq)]
pub struct Version;

impl Executable for Version {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        let version = store.lock().unwrap().version();

        Ok(vec![Response {
            value: Bytes::from(version),
            ..Response::new(Opcode::Version.into())
        }])
    }
}

impl TryFrom<&mut RequestParser> for Version {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        parser.no_value()?;
        parser.finish()?;

        Ok(Version)
    }
}
