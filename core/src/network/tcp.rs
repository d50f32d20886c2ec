use async_trait::async_trait;
use keyprobe_common::network::target::Target;
use tokio::net::TcpStream;

use super::{AttemptError, Connector};

/// Reachability through a plain TCP handshake. The stream is closed as soon
/// as the handshake completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, target: &Target) -> Result<(), AttemptError> {
        let stream: TcpStream = match target.socket_addr() {
            Some(socket_addr) => TcpStream::connect(socket_addr).await?,
            None => TcpStream::connect(target.authority()).await?,
        };
        drop(stream);
        Ok(())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
