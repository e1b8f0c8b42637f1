use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{CommandParserError, RequestParser};
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

/// Expire every current item, immediately or after an optional delay
/// carried as 4 bytes of extras.
#[derive(Debug, PartialEq)]
pub struct Flush {
    pub delay: u32,
    pub quiet: bool,
}

impl Flush {
    fn opcode(&self) -> Opcode {
        if self.quiet {
            Opcode::FlushQ
        } else {
            Opcode::Flush
        }
    }
}

impl Executable for Flush {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        let opcode = self.opcode().into();
        store.lock().unwrap().flush(self.delay);

        if self.quiet {
            Ok(vec![])
        } else {
            Ok(vec![Response::new(opcode)])
        }
    }
}

impl TryFrom<&mut RequestParser> for Flush {
    type Error = CommandParserError;

    fn try_from(parser: &mut RequestParser) -> Result<Self, Self::Error> {
        // The delay extras are optional; no extras means "flush now".
        let delay = if parser.has_extras() {
            parser.next_u32()?
        } else {
            0
        };
        parser.no_value()?;
        parser.finish()?;

        Ok(Flush {
            delay,
            quiet: parser.opcode() == Opcode::FlushQ,
        })
    }
}
