//! Run-scoped logging: console plus local syslog.
//!
//! [`RunLogger`] installs its subscriber as the thread default and removes
//! it again on drop, so nothing is registered process-wide.

use crate::config::LogConfig;
use std::fmt::Write as _;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{EnvFilter, Layer};

/// Default syslog socket.
pub const SYSLOG_SOCKET: &str = "/dev/log";

const IDENT: &str = "cf-ddns";

/// `user-level messages` facility.
const FACILITY_USER: u8 = 1;

/// Logging for the duration of one run.
pub struct RunLogger {
    _guard: tracing::subscriber::DefaultGuard,
}

impl RunLogger {
    /// Build the subscriber and make it the default until the logger drops.
    pub fn init(config: &LogConfig) -> Self {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let syslog = if config.syslog {
            match SyslogLayer::connect(SYSLOG_SOCKET) {
                Ok(layer) => Some(layer),
                Err(e) => {
                    eprintln!("syslog unavailable at {}: {}", SYSLOG_SOCKET, e);
                    None
                }
            }
        } else {
            None
        };

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
            .with(syslog);

        Self {
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}

/// Writes each event as an RFC 3164 line to a Unix datagram socket.
pub struct SyslogLayer {
    #[cfg(unix)]
    socket: std::os::unix::net::UnixDatagram,
    pid: u32,
}

impl SyslogLayer {
    #[cfg(unix)]
    pub fn connect(path: &str) -> std::io::Result<Self> {
        let socket = std::os::unix::net::UnixDatagram::unbound()?;
        socket.connect(path)?;
        Ok(Self {
            socket,
            pid: std::process::id(),
        })
    }

    #[cfg(not(unix))]
    pub fn connect(_path: &str) -> std::io::Result<Self> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "syslog requires a Unix socket",
        ))
    }

    fn format(&self, level: &Level, message: &str) -> String {
        format!(
            "<{}>{}[{}]: {} - {}",
            priority(level),
            IDENT,
            self.pid,
            level,
            message
        )
    }
}

/// Syslog PRI value: facility * 8 + severity.
fn priority(level: &Level) -> u8 {
    let severity = match *level {
        Level::ERROR => 3,
        Level::WARN => 4,
        Level::INFO => 6,
        Level::DEBUG | Level::TRACE => 7,
    };
    FACILITY_USER * 8 + severity
}

/// Collects the message and any structured fields of an event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for SyslogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        #[cfg(unix)]
        {
            let line = self.format(
                event.metadata().level(),
                &format!("{}{}", visitor.message, visitor.fields),
            );
            // Dropped lines are not worth failing the run over.
            let _ = self.socket.send(line.as_bytes());
        }
        #[cfg(not(unix))]
        let _ = visitor;
    }
}
