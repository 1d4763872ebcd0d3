//! TCP server: accept loop, per-connection reader and writer tasks, and
//! the single dispatch loop that exclusively owns the gateway.
//!
//! All inbound events funnel into one mpsc consumer, so handlers never
//! run concurrently against the match state and no locking is needed.

use std::collections::HashMap;

use log::{debug, info, warn};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::common::Slot;
use crate::game::MatchState;
use crate::gateway::Gateway;
use crate::protocol::{ClientEvent, Outbound, Recipient, ServerEvent};
use crate::session::{SessionDirectory, SessionId};
use crate::transport;
use crate::voice::VoiceManager;

/// Commands funneled into the dispatch loop.
enum ServerCommand {
    Connected {
        session: SessionId,
        sender: mpsc::UnboundedSender<ServerEvent>,
    },
    Inbound {
        session: SessionId,
        event: ClientEvent,
    },
    Disconnected {
        session: SessionId,
    },
}

/// Run the server on an already-bound listener until interrupted.
/// `voice_command` is the recognizer program plus leading arguments, or
/// `None` to run without voice subprocesses.
pub async fn run(listener: TcpListener, voice_command: Option<Vec<String>>) -> anyhow::Result<()> {
    let (commands_tx, mut commands_rx) = mpsc::unbounded_channel();
    let (voice_tx, mut voice_rx) = mpsc::unbounded_channel();

    let voice = match voice_command {
        Some(command) => VoiceManager::new(command, voice_tx),
        None => VoiceManager::disabled(voice_tx),
    };
    let mut gateway = Gateway::new(MatchState::new(), SessionDirectory::new(), voice);
    let mut connections: HashMap<SessionId, mpsc::UnboundedSender<ServerEvent>> = HashMap::new();

    tokio::spawn(accept_loop(listener, commands_tx));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                gateway.shutdown();
                return Ok(());
            }
            Some(line) = voice_rx.recv() => {
                let out = gateway.voice_line(line.slot, line.line);
                deliver(&gateway, &mut connections, out);
            }
            Some(command) = commands_rx.recv() => match command {
                ServerCommand::Connected { session, sender } => {
                    connections.insert(session, sender);
                    let out = gateway.connect(session);
                    let rejected = out
                        .iter()
                        .any(|o| matches!(o.event, ServerEvent::GameFull));
                    deliver(&gateway, &mut connections, out);
                    if rejected {
                        // queued events drain before the writer closes the socket
                        connections.remove(&session);
                    }
                }
                ServerCommand::Inbound { session, event } => {
                    let out = gateway.handle(session, event);
                    deliver(&gateway, &mut connections, out);
                }
                ServerCommand::Disconnected { session } => {
                    connections.remove(&session);
                    let out = gateway.disconnect(session);
                    deliver(&gateway, &mut connections, out);
                }
            },
        }
    }
}

async fn accept_loop(listener: TcpListener, commands: mpsc::UnboundedSender<ServerCommand>) {
    let mut next_session: u64 = 0;
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!("accept failed: {}", err);
                continue;
            }
        };
        if let Err(err) = stream.set_nodelay(true) {
            debug!("failed to set nodelay: {}", err);
        }

        next_session += 1;
        let session = SessionId(next_session);
        info!("session {} connected from {}", session, addr);

        let (read_half, write_half) = stream.into_split();
        let (sender, receiver) = mpsc::unbounded_channel();
        if commands
            .send(ServerCommand::Connected { session, sender })
            .is_err()
        {
            return;
        }
        tokio::spawn(connection_writer(write_half, receiver));
        tokio::spawn(connection_reader(read_half, session, commands.clone()));
    }
}

async fn connection_reader(
    mut reader: OwnedReadHalf,
    session: SessionId,
    commands: mpsc::UnboundedSender<ServerCommand>,
) {
    loop {
        match transport::read_frame::<_, ClientEvent>(&mut reader).await {
            Ok(event) => {
                if commands
                    .send(ServerCommand::Inbound { session, event })
                    .is_err()
                {
                    return;
                }
            }
            Err(err) => {
                debug!("session {} read ended: {}", session, err);
                break;
            }
        }
    }
    let _ = commands.send(ServerCommand::Disconnected { session });
}

async fn connection_writer(
    mut writer: OwnedWriteHalf,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
) {
    use tokio::io::AsyncWriteExt;

    while let Some(event) = events.recv().await {
        if let Err(err) = transport::write_frame(&mut writer, &event).await {
            debug!("write failed: {}", err);
            break;
        }
    }
    let _ = writer.shutdown().await;
}

/// Resolve each outbound recipient against the session directory and
/// queue the event on the matching connection(s).
fn deliver(
    gateway: &Gateway,
    connections: &mut HashMap<SessionId, mpsc::UnboundedSender<ServerEvent>>,
    outbounds: Vec<Outbound>,
) {
    for outbound in outbounds {
        match outbound.recipient {
            Recipient::Session(session) => send_to(connections, session, outbound.event),
            Recipient::Slot(slot) => {
                if let Some(session) = gateway.session_for(slot) {
                    send_to(connections, session, outbound.event);
                }
            }
            Recipient::All => {
                for slot in [Slot::One, Slot::Two] {
                    if let Some(session) = gateway.session_for(slot) {
                        send_to(connections, session, outbound.event.clone());
                    }
                }
            }
        }
    }
}

fn send_to(
    connections: &mut HashMap<SessionId, mpsc::UnboundedSender<ServerEvent>>,
    session: SessionId,
    event: ServerEvent,
) {
    if let Some(sender) = connections.get(&session) {
        if sender.send(event).is_err() {
            connections.remove(&session);
        }
    }
}
