use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument};

use crate::commands::executable::Executable;
use crate::commands::Command;
use crate::connection::Connection;
use crate::frame::{Opcode, Response};
use crate::store::LruStore;
use crate::Error;

/// Listen on `addr` and serve the memcached binary protocol backed by
/// `store` until the listener fails. Each accepted connection runs on its
/// own task; requests within a connection are handled strictly in order.
pub async fn run(addr: &str, store: Arc<Mutex<LruStore>>) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind(addr).await?;
    info!("Cache server listening on {}", listener.local_addr()?);

    loop {
        let (socket, client_address) = listener.accept().await?;
        let store = store.clone();
        info!("Accepted connection from {:?}", client_address);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, client_address, store).await {
                error!("Connection error: {}", e);
            }
        });
    }
}

#[instrument(name = "connection", skip(stream, store))]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    store: Arc<Mutex<LruStore>>,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream);

    while let Some(request) = conn.read_request().await? {
        debug!("Received request with opcode {:#04x}", request.opcode);
        let opcode = request.opcode;
        let opaque = request.opaque;
        let quit = opcode == u8::from(Opcode::Quit) || opcode == u8::from(Opcode::QuitQ);

        let responses = match Command::try_from(request) {
            Ok(command) => command.exec(store.clone())?,
            Err(err) => {
                debug!("Rejected request: {}", err);
                vec![Response::error(opcode, err.status())]
            }
        };

        for mut response in responses {
            response.opaque = opaque;
            conn.write_response(response).await?;
        }

        if quit {
            break;
        }
    }

    info!("Connection closed");
    Ok(())
}
