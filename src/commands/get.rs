use bytes::{BufMut, Bytes, BytesMut};
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::{LruStore, StoreError};
use crate::Error;

/// Fetch one item. Hits carry the item flags as 4 bytes of extras, the
/// value payload and the current version. The K variants echo the key;
/// the quiet variants stay silent on a miss so clients can pipeline
/// multi-gets.
///
/// Ref: <https://github.com/memcached/memcached/wiki/BinaryProtocolRevamped#get-get-quietly-get-key-get-key-quietly>
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: Bytes,
    pub include_key: bool,
    pub quiet: bool,
}

impl Get {
    fn opcode(&self) -> Opcode {
        match (self.include_key, self.quiet) {
            (false, false) => Opcode::Get,
            (false, true) => Opcode::GetQ,
            (true, false) => Opcode::GetK,
            (true, true) => Opcode::GetKQ,
        }
    }
}

impl Executable for Get {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        let opcode = self.opcode().into();
        let result = store.lock().unwrap().get(&self.key);

        match result {
            Ok(item) => {
                let mut extras = BytesMut::with_capacity(4);
                extras.put_u32(item.flags);

                let key = if self.include_key {
                    self.key
                } else {
                    Bytes::new()
                };

                Ok(vec![Response {
                    cas: item.cas,
                    extras: extras.freeze(),
                    key,
                    value: item.value,
                    ..Response::new(opcode)
                }])
            }
            Err(StoreError::KeyNotFound) if self.quiet => Ok(vec![]),
            Err(err) => Ok(vec![Response::error(opcode, err.into())]),
        }
    }
}

impl TryFrom<&mut RequestParser> for Get {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        let opcode = parser.opcode();
        let key = parser.key()?;
        parser.no_value()?;
        parser.finish()?;

        Ok(Get {
            key,
            include_key: matches!(opcode, Opcode::GetK | Opcode::GetKQ),
            quiet: matches!(opcode, Opcode::GetQ | Opcode::GetKQ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::frame::{Request, Status};

    fn get_request(opcode: Opcode, key: &'static [u8]) -> Request {
        Request {
            opcode: opcode.into(),
            opaque: 0,
            cas: 0,
            extras: Bytes::new(),
            key: Bytes::from_static(key),
            value: Bytes::new(),
        }
    }

    #[test]
    fn hit_returns_flags_value_and_cas() {
        let store = Arc::new(Mutex::new(LruStore::default()));
        store
            .lock()
            .unwrap()
            .set(b"get_ok", Bytes::from_static(b"atpons"), 3, 0, 0)
            .unwrap();

        let cmd = Command::try_from(get_request(Opcode::Get, b"get_ok")).unwrap();
        let responses = cmd.exec(store).unwrap();

        assert_eq!(responses.len(), 1);
        let response = &responses[0];
        assert_eq!(response.status, Status::NoError);
        assert_eq!(&response.extras[..], 3u32.to_be_bytes());
        assert_eq!(&response.value[..], b"atpons");
        assert!(response.key.is_empty());
        assert_ne!(response.cas, 0);
    }

    #[test]
    fn miss_returns_key_not_found() {
        let store = Arc::new(Mutex::new(LruStore::default()));

        let cmd = Command::try_from(get_request(Opcode::Get, b"key_not_found")).unwrap();
        let responses = cmd.exec(store).unwrap();

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].status, Status::KeyNotFound);
        assert_eq!(&responses[0].value[..], b"Key not found");
    }

    #[test]
    fn quiet_miss_is_suppressed() {
        let store = Arc::new(Mutex::new(LruStore::default()));

        let cmd = Command::try_from(get_request(Opcode::GetQ, b"key_not_found")).unwrap();

        assert!(cmd.exec(store).unwrap().is_empty());
    }

    #[test]
    fn getk_echoes_the_key() {
        let store = Arc::new(Mutex::new(LruStore::default()));
        store
            .lock()
            .unwrap()
            .set(b"k", Bytes::from_static(b"v"), 0, 0, 0)
            .unwrap();

        let cmd = Command::try_from(get_request(Opcode::GetK, b"k")).unwrap();
        let responses = cmd.exec(store).unwrap();

        assert_eq!(&responses[0].key[..], b"k");
        assert_eq!(responses[0].opcode, u8::from(Opcode::GetK));
    }
}
