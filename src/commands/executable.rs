use std::sync::{Arc, Mutex};

use crate::frame::Response;
use crate::store::LruStore;
use crate::Error;

/// A decoded command that can run against the shared store. Commands
/// return every response they want written, in order; quiet commands
/// return an empty vector when the protocol suppresses their answer.
pub trait Executable {
    fn exec(self, store: Arc<Mutex<LruStore>>) -> Result<Vec<Response>, Error>;
}
