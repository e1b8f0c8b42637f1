use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

/// Ask the server to close the connection. The quiet variant closes
/// without acknowledging; the connection loop handles the actual close.
#[derive(Debug, PartialEq)]
pub struct Quit {
    pub quiet: bool,
}

impl Executable for Quit {
    fn exec(self, _store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        if self.quiet {
            Ok(vec![])
        } else {
            Ok(vec![Response::new(Opcode::Quit.into())])
        }
    }
}

impl TryFrom<&mut RequestParser> for Quit {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        parser.no_value()?;
        parser.finish()?;

        Ok(Quit {
            quiet: parser.opcode() == Opcode::QuitQ,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::frame::Request;
    use bytes::Bytes;

    fn quit_request(opcode: Opcode) -> Request {
        Request {
            opcode: opcode.into(),
            opaque: 0,
            cas: 0,
            extras: Bytes::new(),
            key: Bytes::new(),
            value: Bytes::new(),
        }
    }

    #[test]
    fn quit_acknowledges() {
        let store = Arc::new(Mutex::new(LruStore::default()));

        let cmd = Command::try_from(quit_request(Opcode::Quit)).unwrap();

        assert_eq!(cmd.exec(store).unwrap().len(), 1);
    }

    #[test]
    fn quiet_quit_stays_silent() {
        let store = Arc::new(Mutex::new(LruStore::default()));

        let cmd = Command::try_from(quit_request(Opcode::QuitQ)).unwrap();

        assert!(cmd.exec(store).unwrap().is_empty());
    }
}
