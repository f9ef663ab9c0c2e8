use std::net::SocketAddr;
use std::sync::Arc;

use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

use super::{serve_request, Error, ServerContext};

pub struct Listener {
    binding_address: SocketAddr,
    context: Arc<ServerContext>,
}

impl Listener {
    pub fn new(binding_address: SocketAddr, context: ServerContext) -> Self {
        Self {
            binding_address,
            context: Arc::new(context),
        }
    }

    pub async fn serve(&self) -> Result<(), Error> {
        info!("Listening on {}", self.binding_address);
        let listener = build_listener(self.binding_address).await?;

        self.run(listener).await
    }

    pub(crate) async fn run(&self, listener: TcpListener) -> Result<(), Error> {
        loop {
            let (tcp, remote_address) = accept(&listener).await?;
            debug!("Accepted connection from {remote_address}");

            let stream = TokioIo::new(tcp);
            let context = Arc::clone(&self.context);

            tokio::spawn(serve_request(stream, context));
        }
    }
}

pub(crate) async fn build_listener(binding_address: SocketAddr) -> Result<TcpListener, Error> {
    TcpListener::bind(binding_address)
        .await
        .map_err(|err| Error::Initialization(format!("Could not bind {binding_address}: {err}")))
}

async fn accept(listener: &TcpListener) -> Result<(TcpStream, SocketAddr), Error> {
    listener
        .accept()
        .await
        .map_err(|err| Error::Execution(format!("Could not accept a connection: {err}")))
}
