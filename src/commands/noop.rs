use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

/// Does nothing. Clients send it to flush outstanding quiet responses.
#[derive(Debug, PartialEq)]
pub struct Noop;

impl Executable for Noop {
    fn exec(self, _store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        Ok(vec![Response::new(Opcode::Noop.into())])
    }
}

impl TryFrom<&mut RequestParser> for Noop {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        parser.no_value()?;
        parser.finish()?;

        Ok(Noop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::frame::{Request, Status};
    use bytes::Bytes;

    #[test]
    fn responds_with_an_empty_success() {
        let store = Arc::new(Mutex::new(LruStore::default()));

        let request = Request {
            opcode: Opcode::Noop.into(),
            opaque: 0,
            cas: 0,
            extras: Bytes::new(),
            key: Bytes::new(),
            value: Bytes::new(),
        };
        let cmd = Command::try_from(request).unwrap();
        let responses = cmd.exec(store).unwrap();

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].status, Status::NoError);
        assert!(responses[0].value.is_empty());
    }
}
