use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
};

use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::{config::Config, error::Error, handler};

const LISTEN_BACKLOG: i32 = 1024;

pub async fn run(config: Config) -> Result<(), Error> {
    let listener = bind(config.addr)?;
    serve(listener, config.body_limit).await;
    Ok(())
}

/// Must be called from within a tokio runtime.
///
/// `[::]` is bound dual-stack. Hosts without IPv6 fall back to `0.0.0.0`
/// on the same port.
pub fn bind(addr: SocketAddr) -> Result<TcpListener, Error> {
    let (addr, socket) = match listen(addr) {
        Ok(socket) => (addr, socket),
        Err(err) if addr.ip() == Ipv6Addr::UNSPECIFIED && err.kind() != io::ErrorKind::AddrInUse => {
            let fallback = SocketAddr::from((Ipv4Addr::UNSPECIFIED, addr.port()));
            tracing::debug!(message = "IPv6 unavailable, binding IPv4 only", %err, %fallback);
            let socket = listen(fallback).map_err(|source| Error::Bind { addr: fallback, source })?;
            (fallback, socket)
        }
        Err(source) => return Err(Error::Bind { addr, source }),
    };
    let bind_err = |source: io::Error| Error::Bind { addr, source };
    let listener = TcpListener::from_std(socket.into()).map_err(bind_err)?;

    let local_addr = listener.local_addr().map_err(bind_err)?;
    tracing::info!(addr = %local_addr, "Server is listening on port {}", local_addr.port());
    Ok(listener)
}

fn listen(addr: SocketAddr) -> io::Result<socket2::Socket> {
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;
    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;
    socket.set_nonblocking(true)?;
    Ok(socket)
}

pub async fn serve(listener: TcpListener, body_limit: Option<usize>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::warn!(message = "Failed to accept connection", %err);
                continue;
            }
        };
        tracing::debug!(message = "Accepted connection", %peer);

        let io = TokioIo::new(stream);
        tokio::spawn(async move {
            let service = service_fn(move |req| handler::handle(req, body_limit));
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                tracing::debug!(message = "Connection closed", %peer, %err);
            }
        });
    }
}
