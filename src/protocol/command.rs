//! Command definitions
//!
//! Represents commands from clients.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Get = 0x01,
    Set = 0x02,
    Print = 0x03,
    PrintReverse = 0x04,
    Ping = 0x05,
}

impl TryFrom<u8> for CommandType {
    type Error = u8;

    fn try_from(byte: u8) -> std::result::Result<Self, Self::Error> {
        match byte {
            0x01 => Ok(CommandType::Get),
            0x02 => Ok(CommandType::Set),
            0x03 => Ok(CommandType::Print),
            0x04 => Ok(CommandType::PrintReverse),
            0x05 => Ok(CommandType::Ping),
            other => Err(other),
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: Vec<u8> },

    /// Insert or update a key-value pair
    Set { key: Vec<u8>, value: Vec<u8> },

    /// Render the table in ascending key order
    Print,

    /// Render the table in descending key order
    PrintReverse,

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Set { .. } => CommandType::Set,
            Command::Print => CommandType::Print,
            Command::PrintReverse => CommandType::PrintReverse,
            Command::Ping => CommandType::Ping,
        }
    }
}
