pub mod add;
pub mod append;
pub mod decr;
pub mod delete;
pub mod executable;
pub mod flush;
pub mod get;
pub mod incr;
pub mod noop;
pub mod prepend;
pub mod quit;
pub mod replace;
pub mod set;
pub mod stat;
pub mod version;

use bytes::{Buf, Bytes};
use std::sync::{Arc, Mutex};
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::{Opcode, Request, Response, Status};
use crate::store::LruStore;
use crate::Error;

use add::Add;
use append::Append;
use decr::Decrement;
use delete::Delete;
use flush::Flush;
use get::Get;
use incr::Increment;
use noop::Noop;
use prepend::Prepend;
use quit::Quit;
use replace::Replace;
use set::Set;
use stat::Stat;
use version::Version;

/// Memcached limits keys to 250 bytes.
const MAX_KEY_SIZE: usize = 250;

#[derive(Debug, PartialEq)]
pub enum Command {
    Get(Get),
    Set(Set),
    Add(Add),
    Replace(Replace),
    Delete(Delete),
    Increment(Increment),
    Decrement(Decrement),
    Append(Append),
    Prepend(Prepend),
    Flush(Flush),
    Version(Version),
    Stat(Stat),
    Noop(Noop),
    Quit(Quit),
}

impl Executable for Command {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error> {
        match self {
            Command::Get(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
            Command::Add(cmd) => cmd.exec(store),
            Command::Replace(cmd) => cmd.exec(store),
            Command::Delete(cmd) => cmd.exec(store),
            Command::Increment(cmd) => cmd.exec(store),
            Command::Decrement(cmd) => cmd.exec(store),
            Command::Append(cmd) => cmd.exec(store),
            Command::Prepend(cmd) => cmd.exec(store),
            Command::Flush(cmd) => cmd.exec(store),
            Command::Version(cmd) => cmd.exec(store),
            Command::Stat(cmd) => cmd.exec(store),
            Command::Noop(cmd) => cmd.exec(store),
            Command::Quit(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<Request> for Command {
    type Error = CommandParserError;

    fn try_from(request: Request) -> Result<Self, Self::Error> {
        let opcode = Opcode::try_from(request.opcode)
            .map_err(CommandParserError::UnknownCommand)?;

        let parser = &mut RequestParser::new(opcode, request);

        match opcode {
            Opcode::Get | Opcode::GetQ | Opcode::GetK | Opcode::GetKQ => {
                Get::try_from(parser).map(Command::Get)
            }
            Opcode::Set | Opcode::SetQ => Set::try_from(parser).map(Command::Set),
            Opcode::Add | Opcode::AddQ => Add::try_from(parser).map(Command::Add),
            Opcode::Replace | Opcode::ReplaceQ => Replace::try_from(parser).map(Command::Replace),
            Opcode::Delete | Opcode::DeleteQ => Delete::try_from(parser).map(Command::Delete),
            Opcode::Increment | Opcode::IncrementQ => {
                Increment::try_from(parser).map(Command::Increment)
            }
            Opcode::Decrement | Opcode::DecrementQ => {
                Decrement::try_from(parser).map(Command::Decrement)
            }
            Opcode::Append | Opcode::AppendQ => Append::try_from(parser).map(Command::Append),
            Opcode::Prepend | Opcode::PrependQ => Prepend::try_from(parser).map(Command::Prepend),
            Opcode::Flush | Opcode::FlushQ => Flush::try_from(parser).map(Command::Flush),
            Opcode::Version => Version::try_from(parser).map(Command::Version),
            Opcode::Stat => Stat::try_from(parser).map(Command::Stat),
            Opcode::Noop => Noop::try_from(parser).map(Command::Noop),
            Opcode::Quit | Opcode::QuitQ => Quit::try_from(parser).map(Command::Quit),
        }
    }
}

/// Pulls the opcode-specific pieces out of a decoded request: fixed-width
/// extras fields in order, then the key and value payloads.
pub(crate) struct RequestParser {
    opcode: Opcode,
    cas: u64,
    extras: Bytes,
    key: Bytes,
    value: Bytes,
}

impl RequestParser {
    fn new(opcode: Opcode, request: Request) -> RequestParser {
        RequestParser {
            opcode,
            cas: request.cas,
            extras: request.extras,
            key: request.key,
            value: request.value,
        }
    }

    pub(crate) fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub(crate) fn cas(&self) -> u64 {
        self.cas
    }

    pub(crate) fn key(&mut self) -> Result<Bytes, CommandParserError> {
        let key = std::mem::take(&mut self.key);
        if key.is_empty() || key.len() > MAX_KEY_SIZE {
            return Err(CommandParserError::InvalidKey(key.len()));
        }
        Ok(key)
    }

    /// The key payload as-is; Stat uses an empty key to mean "all groups".
    pub(crate) fn optional_key(&mut self) -> Bytes {
        std::mem::take(&mut self.key)
    }

    pub(crate) fn value(&mut self) -> Bytes {
        std::mem::take(&mut self.value)
    }

    pub(crate) fn next_u32(&mut self) -> Result<u32, CommandParserError> {
        if self.extras.len() < 4 {
            return Err(self.invalid_extras());
        }
        Ok(self.extras.get_u32())
    }

    pub(crate) fn next_u64(&mut self) -> Result<u64, CommandParserError> {
        if self.extras.len() < 8 {
            return Err(self.invalid_extras());
        }
        Ok(self.extras.get_u64())
    }

    pub(crate) fn has_extras(&self) -> bool {
        !self.extras.is_empty()
    }

    pub(crate) fn no_value(&self) -> Result<(), CommandParserError> {
        if !self.value.is_empty() {
            return Err(CommandParserError::UnexpectedValue {
                opcode: self.opcode.into(),
            });
        }
        Ok(())
    }

    /// Every extras byte must have been consumed by the command.
    pub(crate) fn finish(&self) -> Result<(), CommandParserError> {
        if !self.extras.is_empty() {
            return Err(self.invalid_extras());
        }
        Ok(())
    }

    fn invalid_extras(&self) -> CommandParserError {
        CommandParserError::InvalidExtras {
            opcode: self.opcode.into(),
        }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("unknown command: {0:#04x}")]
    UnknownCommand(u8),
    #[error("invalid key length: {0}")]
    InvalidKey(usize),
    #[error("invalid extras for opcode {opcode:#04x}")]
    InvalidExtras { opcode: u8 },
    #[error("unexpected value payload for opcode {opcode:#04x}")]
    UnexpectedValue { opcode: u8 },
}

impl CommandParserError {
    pub fn status(&self) -> Status {
        match self {
            CommandParserError::UnknownCommand(_) => Status::UnknownCommand,
            _ => Status::InvalidArguments,
        }
    }
}
