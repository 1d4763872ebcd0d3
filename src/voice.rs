//! Per-player voice recognizer subprocesses.
//!
//! Each connected player gets one long-lived external recognizer process,
//! launched with the player number as its argument. Stdout lines that
//! begin with a recognized command keyword are forwarded to the dispatch
//! loop over a channel; everything else is dropped. Delivery is
//! fire-and-forget: the match never waits on, and is never affected by,
//! a recognizer fault.

use std::process::Stdio;

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::common::Slot;

/// Keywords a recognizer line must start with to be relayed.
const COMMAND_KEYWORDS: [&str; 2] = ["PLACE_SHIP", "FIRE"];

/// A recognized line produced by one player's voice recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceLine {
    pub slot: Slot,
    pub line: String,
}

struct VoiceProcess {
    child: Child,
    activate: UnboundedSender<()>,
}

/// Launches and owns one recognizer subprocess per player slot.
pub struct VoiceManager {
    /// Program plus leading arguments; `None` disables voice entirely.
    command: Option<Vec<String>>,
    events: UnboundedSender<VoiceLine>,
    processes: [Option<VoiceProcess>; 2],
}

impl VoiceManager {
    pub fn new(command: Vec<String>, events: UnboundedSender<VoiceLine>) -> Self {
        Self {
            command: Some(command),
            events,
            processes: [None, None],
        }
    }

    /// Manager that never launches a subprocess. Voice events are simply
    /// absent; everything else behaves the same.
    pub fn disabled(events: UnboundedSender<VoiceLine>) -> Self {
        Self {
            command: None,
            events,
            processes: [None, None],
        }
    }

    /// Spawn the recognizer for `slot`. Failure to start is logged and
    /// leaves the match unaffected.
    pub fn spawn(&mut self, slot: Slot) {
        let Some(command) = &self.command else {
            return;
        };
        let Some((program, args)) = command.split_first() else {
            return;
        };

        let mut child = match Command::new(program)
            .args(args)
            .arg(slot.number().to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                warn!("failed to start voice recognizer for player {}: {}", slot, err);
                return;
            }
        };

        if let Some(stdout) = child.stdout.take() {
            let events = self.events.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if COMMAND_KEYWORDS.iter().any(|kw| line.starts_with(kw)) {
                        if events.send(VoiceLine { slot, line }).is_err() {
                            break;
                        }
                    } else {
                        debug!("player {} voice output ignored: {}", slot, line);
                    }
                }
                debug!("voice recognizer stdout closed for player {}", slot);
            });
        }

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    warn!("player {} voice recognizer: {}", slot, line);
                }
            });
        }

        // the writer task owns stdin so activation never blocks dispatch
        let (activate, mut activations) = mpsc::unbounded_channel::<()>();
        if let Some(mut stdin) = child.stdin.take() {
            tokio::spawn(async move {
                while activations.recv().await.is_some() {
                    if let Err(err) = stdin.write_all(b"start\n").await {
                        warn!("failed to signal voice recognizer for player {}: {}", slot, err);
                        break;
                    }
                }
            });
        }

        info!("voice recognizer started for player {}", slot);
        self.processes[slot.index()] = Some(VoiceProcess { child, activate });
    }

    /// Forward the start signal to `slot`'s recognizer, if it has one.
    pub fn activate(&mut self, slot: Slot) {
        match &self.processes[slot.index()] {
            Some(process) => {
                info!("voice command activated for player {}", slot);
                let _ = process.activate.send(());
            }
            None => debug!("no voice recognizer for player {}", slot),
        }
    }

    /// Kill `slot`'s recognizer and drop its channels. Idempotent.
    pub fn terminate(&mut self, slot: Slot) {
        if let Some(mut process) = self.processes[slot.index()].take() {
            if let Err(err) = process.child.start_kill() {
                debug!("voice recognizer for player {} already gone: {}", slot, err);
            }
            info!("terminated voice recognizer for player {}", slot);
        }
    }

    /// Kill every live recognizer; called at server shutdown.
    pub fn shutdown(&mut self) {
        for slot in [Slot::One, Slot::Two] {
            self.terminate(slot);
        }
    }
}
