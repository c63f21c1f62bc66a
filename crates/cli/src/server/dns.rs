use delirium_infrastructure::dns::DnsServerHandler;
use hickory_server::ServerFuture;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tracing::info;

const TCP_TIMEOUT: Duration = Duration::from_secs(10);

/// Binds UDP and TCP on `bind_addr`. Bind failures surface here, before
/// anything is spawned.
pub async fn bind_dns_server(
    bind_addr: &str,
    handler: DnsServerHandler,
) -> anyhow::Result<ServerFuture<DnsServerHandler>> {
    let socket_addr: SocketAddr = bind_addr.parse()?;

    let udp_socket = UdpSocket::bind(socket_addr).await?;
    let tcp_listener = TcpListener::bind(socket_addr).await?;

    let mut server = ServerFuture::new(handler);
    server.register_socket(udp_socket);
    server.register_listener(tcp_listener, TCP_TIMEOUT);

    info!(bind_address = %socket_addr, "DNS server ready (UDP + TCP)");
    Ok(server)
}
