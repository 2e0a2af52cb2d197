//! TCP transport for workers in other processes.
//!
//! Messages are JSON objects, one per line. A worker writes a `Request` and
//! reads back exactly one `Reply`; the coordinator closes the connection after
//! sending the terminal reply.

use super::channel::{Reply, Request, RequestHandler, TransportError, WorkerLink};
use serde::Serialize;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::thread::{self, JoinHandle};

fn write_message<T: Serialize>(writer: &mut TcpStream, message: &T) -> Result<(), TransportError> {
    serde_json::to_writer(&mut *writer, message)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Worker end of a TCP connection to the coordinator.
pub struct TcpLink {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    line: String,
}

impl TcpLink {
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: stream,
            line: String::new(),
        })
    }
}

impl WorkerLink for TcpLink {
    fn request(&mut self, request: Request) -> Result<Reply, TransportError> {
        write_message(&mut self.writer, &request)?;

        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Err(TransportError::Disconnected);
        }
        Ok(serde_json::from_str(self.line.trim_end())?)
    }
}

/// Accept worker connections on `listener`, serving each on its own thread.
pub fn serve_tcp<H: RequestHandler>(listener: TcpListener, handler: H) -> JoinHandle<()> {
    thread::spawn(move || {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let handler = handler.clone();
                    thread::spawn(move || {
                        if let Err(err) = serve_connection(stream, &handler) {
                            tracing::warn!("worker connection failed: {}", err);
                        }
                    });
                }
                Err(err) => tracing::warn!("failed to accept worker connection: {}", err),
            }
        }
    })
}

fn serve_connection<H: RequestHandler>(stream: TcpStream, handler: &H) -> Result<(), TransportError> {
    let peer = stream.peer_addr()?;
    stream.set_nodelay(true)?;
    tracing::info!(%peer, "remote worker connected");

    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            tracing::info!(%peer, "remote worker disconnected");
            return Ok(());
        }

        let request: Request = serde_json::from_str(line.trim_end())?;
        let reply = handler.handle(request);
        let done = reply.is_done();

        if let Err(err) = write_message(&mut writer, &reply) {
            if let Some(job) = reply.job {
                handler.reclaim(job);
            }
            return Err(err);
        }
        if done {
            tracing::debug!(%peer, "remote worker released");
            return Ok(());
        }
    }
}
