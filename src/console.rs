//! Console
//!
//! Line-oriented control surface over an [`Engine`], used by `quantactl`.
//!
//! ## Commands
//! ```text
//! open <device> [r|w|rw|a]   bind the session handle (default rw)
//! close                      drop the session handle
//! write <text>               write all of <text> at the position
//! read <count>               read up to <count> bytes (one quantum per call)
//! seek <offset> [set|cur|end]
//! stat                       introspection report of every device
//! help
//! ```
//! Mode `w` truncates the device on open, `a` appends.

use std::sync::Arc;

use crate::engine::Engine;
use crate::error::{Result, StoreError};
use crate::guard::CancelToken;
use crate::handle::{DeviceHandle, OpenOptions};
use crate::seek::Whence;

/// Access mode requested by `open`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
    ReadWrite,
    Append,
}

impl OpenMode {
    fn parse(token: &str) -> Result<Self> {
        match token {
            "r" => Ok(OpenMode::Read),
            "w" => Ok(OpenMode::Write),
            "rw" => Ok(OpenMode::ReadWrite),
            "a" => Ok(OpenMode::Append),
            other => Err(StoreError::Command(format!("unknown open mode '{}'", other))),
        }
    }

    fn options(self) -> OpenOptions {
        match self {
            OpenMode::Read => OpenOptions::read_only(),
            OpenMode::Write => OpenOptions::write_only(),
            OpenMode::ReadWrite => OpenOptions::read_write(),
            OpenMode::Append => OpenOptions::new().write(true).append(true),
        }
    }
}

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Open { device: usize, mode: OpenMode },
    Close,
    Write { data: Vec<u8> },
    Read { count: usize },
    Seek { offset: i64, whence: Whence },
    Stat,
    Help,
}

impl ConsoleCommand {
    /// Parse one non-empty line
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        match word {
            "open" => {
                let device = parse_number(args.next(), "device")?;
                let mode = args.next().map(OpenMode::parse).transpose()?;
                Ok(ConsoleCommand::Open {
                    device,
                    mode: mode.unwrap_or(OpenMode::ReadWrite),
                })
            }
            "close" => Ok(ConsoleCommand::Close),
            "write" => Ok(ConsoleCommand::Write {
                data: rest.as_bytes().to_vec(),
            }),
            "read" => Ok(ConsoleCommand::Read {
                count: parse_number(args.next(), "count")?,
            }),
            "seek" => {
                let offset = parse_number(args.next(), "offset")?;
                let whence = match args.next() {
                    None | Some("set") => Whence::FromStart,
                    Some("cur") => Whence::FromCurrent,
                    Some("end") => Whence::FromEnd,
                    Some(other) => {
                        return Err(StoreError::Command(format!("unknown whence '{}'", other)))
                    }
                };
                Ok(ConsoleCommand::Seek { offset, whence })
            }
            "stat" => Ok(ConsoleCommand::Stat),
            "help" => Ok(ConsoleCommand::Help),
            "" => Err(StoreError::Command("empty command".into())),
            other => Err(StoreError::Command(format!("unknown command '{}'", other))),
        }
    }
}

fn parse_number<T: std::str::FromStr>(token: Option<&str>, what: &str) -> Result<T> {
    let token = token.ok_or_else(|| StoreError::Command(format!("missing {}", what)))?;
    token
        .parse()
        .map_err(|_| StoreError::Command(format!("invalid {} '{}'", what, token)))
}

const HELP: &str = "commands: open <device> [r|w|rw|a], close, write <text>, \
read <count>, seek <offset> [set|cur|end], stat, help";

/// A console session: an engine plus at most one open handle
pub struct Console {
    engine: Arc<Engine>,
    handle: Option<DeviceHandle>,
    cancel: CancelToken,
}

impl Console {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            handle: None,
            cancel: CancelToken::new(),
        }
    }

    /// Token shared by every lock acquisition of this session
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Parse and execute one line; blank lines and `#` comments yield nothing
    pub fn run_line(&mut self, line: &str) -> Result<Option<String>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        self.execute(ConsoleCommand::parse(line)?).map(Some)
    }

    /// Execute a command, returning its text output
    pub fn execute(&mut self, command: ConsoleCommand) -> Result<String> {
        match command {
            ConsoleCommand::Open { device, mode } => {
                let options = mode.options().cancel(self.cancel.clone());
                self.handle = Some(self.engine.open(device, options)?);
                Ok(format!("device {} open ({:?})", device, mode))
            }
            ConsoleCommand::Close => match self.handle.take() {
                Some(handle) => Ok(format!("device {} closed", handle.device_index())),
                None => Ok("no device open".to_string()),
            },
            ConsoleCommand::Write { data } => {
                let handle = self.handle_mut()?;
                handle.write_all(&data)?;
                Ok(format!("wrote {} bytes, position {}", data.len(), handle.position()))
            }
            ConsoleCommand::Read { count } => {
                let handle = self.handle_mut()?;
                let mut buf = vec![0u8; count];
                let n = handle.read(&mut buf)?;
                Ok(format!("{} bytes: {:?}", n, String::from_utf8_lossy(&buf[..n])))
            }
            ConsoleCommand::Seek { offset, whence } => {
                let position = self.handle_mut()?.seek(offset, whence)?;
                Ok(format!("position {}", position))
            }
            ConsoleCommand::Stat => self.engine.report(self.cancel.clone()),
            ConsoleCommand::Help => Ok(HELP.to_string()),
        }
    }

    fn handle_mut(&mut self) -> Result<&mut DeviceHandle> {
        self.handle
            .as_mut()
            .ok_or_else(|| StoreError::Command("no device open".into()))
    }
}
