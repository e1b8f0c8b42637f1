use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

/// Concatenate the request value after an existing item's value. Flags
/// and expiration are left untouched; the item gets a new version.
#[derive(Debug, PartialEq)]
pub struct Append {
    pub key: Bytes,
    pub value: Bytes,
    pub quiet: bool,
}

impl Append {
    fn opcode(&self) -> Opcode {
        if self.quiet {
            Opcode::AppendQ
        } else {
            Opcode::Append
        }
    }
}

impl Executable for Append {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        let opcode = self.opcode().into();
        let result = store.lock().unwrap().append(&self.key, &self.value);

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

impl TryFrom<&mut RequestParser> for Append {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        let key = parser.key()?;
        parser.finish()?;

        Ok(Append {
            key,
            value: parser.value(),
            quiet: parser.opcode() == Opcode::AppendQ,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::frame::{Request, Status};

    fn append_request(key: &'static [u8], value: &'static [u8]) -> Request {
        Request {
            opcode: Opcode::Append.into(),
            opaque: 0,
            cas: 0,
            extras: Bytes::new(),
            key: Bytes::from_static(key),
            value: Bytes::from_static(value),
        }
    }

    #[test]
    fn appends_to_an_existing_value() {
        let store = Arc::new(Mutex::new(LruStore::default()));
        store
            .lock()
            .unwrap()
            .set(b"append_normal", Bytes::from_static(b"at"), 0, 0, 0)
            .unwrap();

        let cmd = Command::try_from(append_request(b"append_normal", b"pons")).unwrap();
        let responses = cmd.exec(store.clone()).unwrap();

        assert_eq!(responses[0].status, Status::NoError);
        let item = store.lock().unwrap().get(b"append_normal").unwrap();
        assert_eq!(&item.value[..], b"atpons");
    }

    #[test]
    fn missing_key_reports_not_stored() {
        let store = Arc::new(Mutex::new(LruStore::default()));

        let cmd = Command::try_from(append_request(b"nope", b"pons")).unwrap();
        let responses = cmd.exec(store).unwrap();

        assert_eq!(responses[0].status, Status::ItemNotStored);
    }
}
