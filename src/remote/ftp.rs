//! FTP backend for [`RemoteStore`]

use std::io::Cursor;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use suppaftp::list::File as ListedFile;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};

use super::{DirectoryEntry, RemoteStore};
use crate::core::config::RemoteSettings;
use crate::error::StoreError;

/// A single authenticated FTP session.
///
/// The session is closed by [`RemoteStore::close`]; a store dropped without
/// being closed sends `QUIT` on drop.
pub struct FtpStore {
    stream: Option<FtpStream>,
    endpoint: String,
}

impl FtpStore {
    /// Connect, log in and switch to binary transfers.
    ///
    /// `settings.timeout_secs` bounds the connect and every read or write that
    /// follows, on the control channel and on each passive data connection.
    pub fn connect(settings: &RemoteSettings) -> Result<Self, StoreError> {
        let connect_error = |message: String| StoreError::Connect {
            host: settings.host.clone(),
            port: settings.port,
            message,
        };

        let addr = resolve_addr(&settings.host, settings.port).map_err(connect_error)?;
        let timeout = settings.timeout();

        log::debug!("Connecting to FTP server {} (timeout {:?})", addr, timeout);
        let mut stream = FtpStream::connect_timeout(addr, timeout)
            .map_err(|e| connect_error(e.to_string()))?
            .passive_stream_builder(move |data_addr| {
                open_data_stream(&data_addr, timeout).map_err(FtpError::ConnectionError)
            });

        apply_timeouts(&stream, timeout).map_err(|e| connect_error(e.to_string()))?;

        stream
            .login(&settings.user, &settings.password)
            .map_err(|e| connect_error(format!("login as '{}' failed: {}", settings.user, e)))?;
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| connect_error(e.to_string()))?;

        log::info!("Connected to {}:{} as {}", settings.host, settings.port, settings.user);

        Ok(Self {
            stream: Some(stream),
            endpoint: format!("{}:{}", settings.host, settings.port),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn stream(&mut self) -> Result<&mut FtpStream, StoreError> {
        self.stream.as_mut().ok_or(StoreError::Closed)
    }
}

fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| e.to_string())?
        .next()
        .ok_or_else(|| format!("no address found for {}", host))
}

fn apply_timeouts(stream: &FtpStream, timeout: Duration) -> std::io::Result<()> {
    let tcp = stream.get_ref();
    tcp.set_read_timeout(Some(timeout))?;
    tcp.set_write_timeout(Some(timeout))
}

/// Passive data connection with the same deadline as the control channel
fn open_data_stream(addr: &SocketAddr, timeout: Duration) -> std::io::Result<TcpStream> {
    let stream = TcpStream::connect_timeout(addr, timeout)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;
    Ok(stream)
}

/// Convert one raw `LIST` line into a structured entry.
///
/// Lines the parser does not understand (totals, banners) yield `None`, as do
/// the `.` and `..` pseudo-entries.
fn parse_list_line(line: &str) -> Option<DirectoryEntry> {
    let listed: ListedFile = match line.parse() {
        Ok(file) => file,
        Err(e) => {
            log::debug!("Skipping unparsable LIST line {:?}: {:?}", line, e);
            return None;
        }
    };

    let name = listed.name();
    if name == "." || name == ".." {
        return None;
    }

    Some(DirectoryEntry {
        name: name.to_string(),
        is_directory: listed.is_directory(),
        size: listed.size() as u64,
    })
}

impl RemoteStore for FtpStore {
    fn size(&mut self, path: &str) -> Result<u64, StoreError> {
        self.stream()?
            .size(path)
            .map(|size| size as u64)
            .map_err(|e| StoreError::operation("SIZE", path, e))
    }

    fn read_all(&mut self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.stream()?
            .retr_as_buffer(path)
            .map(Cursor::into_inner)
            .map_err(|e| StoreError::operation("RETR", path, e))
    }

    fn write_all(&mut self, path: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut reader = Cursor::new(data);
        self.stream()?
            .put_file(path, &mut reader)
            .map(|_| ())
            .map_err(|e| StoreError::operation("STOR", path, e))
    }

    fn delete(&mut self, path: &str) -> Result<(), StoreError> {
        self.stream()?
            .rm(path)
            .map_err(|e| StoreError::operation("DELE", path, e))
    }

    fn make_dir(&mut self, path: &str) -> Result<(), StoreError> {
        self.stream()?
            .mkdir(path)
            .map_err(|e| StoreError::operation("MKD", path, e))
    }

    fn list_dir(&mut self, path: &str) -> Result<Vec<DirectoryEntry>, StoreError> {
        let lines = self
            .stream()?
            .list(Some(path))
            .map_err(|e| StoreError::operation("LIST", path, e))?;

        Ok(lines.iter().filter_map(|line| parse_list_line(line)).collect())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        let mut stream = self.stream.take().ok_or(StoreError::Closed)?;
        log::debug!("Closing FTP session to {}", self.endpoint);
        stream
            .quit()
            .map_err(|e| StoreError::operation("QUIT", self.endpoint.clone(), e))
    }
}

impl Drop for FtpStore {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.quit() {
                log::warn!("FTP session to {} did not close cleanly: {}", self.endpoint, e);
            }
        }
    }
}
