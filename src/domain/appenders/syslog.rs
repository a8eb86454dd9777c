//! Syslog appenders: local socket and remote UDP relay.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::Mutex;

use super::Appender;
use crate::domain::layouts::{BasicLayout, Layout};
use crate::domain::{LoggingEvent, Priority};

/// `LOG_USER` facility code (already shifted, as in `<syslog.h>`).
pub const LOG_USER: i32 = 1 << 3;

/// Highest facility code, `LOG_LOCAL7`.
pub const LOG_LOCAL7: i32 = 23 << 3;

/// Conventional syslog UDP port.
pub const DEFAULT_SYSLOG_PORT: u16 = 514;

#[cfg(unix)]
const LOCAL_SYSLOG_SOCKET: &str = "/dev/log";

/// Build a `<PRI>identity: message` datagram. Trailing newlines from the
/// layout are dropped since syslog records are single-line. The low three
/// bits of the facility belong to the severity.
fn datagram(facility: i32, priority: Priority, identity: &str, text: &str) -> String {
    format!(
        "<{}>{}: {}",
        (facility.clamp(0, LOG_LOCAL7) & !0x7) | priority.to_syslog_severity(),
        identity,
        text.trim_end_matches(['\r', '\n'])
    )
}

/// Appender for the local syslog daemon.
#[derive(Debug)]
pub struct SyslogAppender {
    name: String,
    identity: String,
    facility: i32,
    layout: Box<dyn Layout>,
    #[cfg(unix)]
    socket: Mutex<Option<std::os::unix::net::UnixDatagram>>,
}

impl SyslogAppender {
    pub fn new(name: &str, identity: &str, facility: i32) -> Self {
        Self {
            name: name.to_string(),
            identity: identity.to_string(),
            facility,
            layout: Box::new(BasicLayout::new()),
            #[cfg(unix)]
            socket: Mutex::new(None),
        }
    }
}

impl Appender for SyslogAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "syslog"
    }

    fn target(&self) -> String {
        format!("syslog({}, facility {})", self.identity, self.facility)
    }

    fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    fn set_layout(&mut self, layout: Box<dyn Layout>) {
        self.layout = layout;
    }

    #[cfg(unix)]
    fn append(&self, event: &LoggingEvent) -> io::Result<()> {
        use std::os::unix::net::UnixDatagram;

        let message = datagram(
            self.facility,
            event.priority,
            &self.identity,
            &self.layout.format(event),
        );
        let mut guard = self
            .socket
            .lock()
            .map_err(|_| io::Error::other("syslog appender lock poisoned"))?;
        if guard.is_none() {
            let socket = UnixDatagram::unbound()?;
            socket.connect(LOCAL_SYSLOG_SOCKET)?;
            *guard = Some(socket);
        }
        match guard.as_ref() {
            Some(socket) => socket.send(message.as_bytes()).map(|_| ()),
            None => Ok(()),
        }
    }

    #[cfg(not(unix))]
    fn append(&self, _event: &LoggingEvent) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "local syslog is only available on Unix",
        ))
    }
}

/// Appender sending syslog datagrams to a remote relay over UDP.
#[derive(Debug)]
pub struct RemoteSyslogAppender {
    name: String,
    identity: String,
    relay_host: String,
    facility: i32,
    port: u16,
    layout: Box<dyn Layout>,
    socket: Mutex<Option<(UdpSocket, SocketAddr)>>,
}

impl RemoteSyslogAppender {
    pub fn new(name: &str, identity: &str, relay_host: &str, facility: i32, port: u16) -> Self {
        Self {
            name: name.to_string(),
            identity: identity.to_string(),
            relay_host: relay_host.to_string(),
            facility,
            port,
            layout: Box::new(BasicLayout::new()),
            socket: Mutex::new(None),
        }
    }

    /// Resolve the relay and bind a socket of the same address family.
    fn connect(&self) -> io::Result<(UdpSocket, SocketAddr)> {
        let relay = (self.relay_host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("syslog relay {} did not resolve", self.relay_host),
                )
            })?;
        let local = match relay {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        };
        Ok((UdpSocket::bind(local)?, relay))
    }
}

impl Appender for RemoteSyslogAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "remotesyslog"
    }

    fn target(&self) -> String {
        format!(
            "{}:{} ({}, facility {})",
            self.relay_host, self.port, self.identity, self.facility
        )
    }

    fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    fn set_layout(&mut self, layout: Box<dyn Layout>) {
        self.layout = layout;
    }

    fn append(&self, event: &LoggingEvent) -> io::Result<()> {
        let message = datagram(
            self.facility,
            event.priority,
            &self.identity,
            &self.layout.format(event),
        );
        let mut guard = self
            .socket
            .lock()
            .map_err(|_| io::Error::other("remote syslog appender lock poisoned"))?;
        if guard.is_none() {
            *guard = Some(self.connect()?);
        }
        match guard.as_ref() {
            Some((socket, relay)) => socket.send_to(message.as_bytes(), *relay).map(|_| ()),
            None => Ok(()),
        }
    }
}
