use std::io::{self, BufRead, BufReader, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use intake_core::ActivationEvent;
use intake_logging::{intake_info, intake_warn};

/// Outcome of attempting to become the single running instance.
pub enum GateOutcome {
    Primary(InstanceGate),
    /// Another instance holds the lock. The activation URL, if any, has
    /// already been forwarded there; the caller must terminate without
    /// performing any further initialization.
    Secondary,
}

/// Process-wide exclusivity via a loopback listener.
///
/// The bound socket is the lock. Later launches fail to bind, connect
/// instead, and forward their activation URL as a line; each forwarded line
/// surfaces here as a `SecondInstance` activation event.
pub struct InstanceGate {
    port: u16,
    events: Receiver<ActivationEvent>,
}

impl InstanceGate {
    /// Try to become the primary instance on `port` (0 picks a free port,
    /// useful in tests).
    pub fn acquire(port: u16, activation_url: Option<&str>) -> io::Result<GateOutcome> {
        match TcpListener::bind((Ipv4Addr::LOCALHOST, port)) {
            Ok(listener) => {
                let port = listener.local_addr()?.port();
                let (tx, rx) = mpsc::channel();
                thread::spawn(move || accept_loop(listener, tx));
                intake_info!("instance gate acquired on 127.0.0.1:{port}");
                Ok(GateOutcome::Primary(Self { port, events: rx }))
            }
            Err(err) if err.kind() == io::ErrorKind::AddrInUse => {
                forward_activation(port, activation_url)?;
                Ok(GateOutcome::Secondary)
            }
            Err(err) => Err(err),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Non-blocking poll for forwarded activation events.
    pub fn try_recv(&self) -> Option<ActivationEvent> {
        self.events.try_recv().ok()
    }

    /// Blocking poll with a deadline.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ActivationEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}

fn accept_loop(listener: TcpListener, tx: mpsc::Sender<ActivationEvent>) {
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(err) => {
                intake_warn!("instance gate accept failed: {err}");
                continue;
            }
        };
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    intake_info!("second instance forwarded activation: {line}");
                    if tx.send(ActivationEvent::second_instance(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    intake_warn!("activation forward read failed: {err}");
                    break;
                }
            }
        }
    }
}

fn forward_activation(port: u16, activation_url: Option<&str>) -> io::Result<()> {
    let mut stream = TcpStream::connect((Ipv4Addr::LOCALHOST, port))?;
    if let Some(url) = activation_url {
        stream.write_all(url.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()?;
    }
    Ok(())
}
