mod board;
mod common;
mod config;
mod game;
mod gateway;
mod logging;
mod phase;
pub mod protocol;
pub mod server;
mod session;
mod ship;
pub mod transport;
mod voice;

pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use gateway::Gateway;
pub use logging::init_logging;
pub use phase::{Phase, PhaseMachine};
pub use protocol::*;
pub use session::{SessionDirectory, SessionId};
pub use ship::ShipType;
pub use transport::tcp::TcpTransport;
pub use voice::{VoiceLine, VoiceManager};
