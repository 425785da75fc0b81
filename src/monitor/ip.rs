use crate::error::SampleError;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

/// Address of the interface the host would use to reach `target`.
///
/// Connecting a UDP socket only selects a route; nothing is sent.
pub fn outbound_ip(target: SocketAddr, timeout: Duration) -> Result<IpAddr, SampleError> {
    let bind: SocketAddr = match target {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    let socket = UdpSocket::bind(bind).map_err(SampleError::Connectivity)?;
    socket
        .set_read_timeout(Some(timeout))
        .map_err(SampleError::Connectivity)?;
    socket
        .set_write_timeout(Some(timeout))
        .map_err(SampleError::Connectivity)?;
    socket.connect(target).map_err(SampleError::Connectivity)?;

    let local = socket.local_addr().map_err(SampleError::Connectivity)?.ip();
    if local.is_unspecified() {
        return Err(SampleError::Connectivity(io::Error::new(
            io::ErrorKind::NotConnected,
            "no route to probe address",
        )));
    }
    Ok(local)
}
