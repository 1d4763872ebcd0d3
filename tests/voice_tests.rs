//! These tests use small `sh` scripts as stand-in recognizers.

use broadside::{Slot, VoiceLine, VoiceManager};
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

fn script_manager(script: &str) -> (VoiceManager, mpsc::UnboundedReceiver<VoiceLine>) {
    let (events, receiver) = mpsc::unbounded_channel();
    let manager = VoiceManager::new(
        vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        events,
    );
    (manager, receiver)
}

#[tokio::test]
async fn test_recognized_lines_are_forwarded_with_slot() {
    // $0 is the player number appended by the manager
    let (mut manager, mut receiver) = script_manager("echo chatter; echo FIRE 3 4 $0");
    manager.spawn(Slot::One);

    let line = timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("recognizer produced no line")
        .unwrap();
    assert_eq!(line.slot, Slot::One);
    assert_eq!(line.line, "FIRE 3 4 1");
    // the chatter line was filtered before FIRE arrived
    assert!(receiver.try_recv().is_err());

    manager.shutdown();
}

#[tokio::test]
async fn test_place_ship_keyword_is_recognized() {
    let (mut manager, mut receiver) = script_manager("echo PLACE_SHIP carrier 0 0 H $0");
    manager.spawn(Slot::Two);

    let line = timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("recognizer produced no line")
        .unwrap();
    assert_eq!(line.slot, Slot::Two);
    assert!(line.line.starts_with("PLACE_SHIP"));

    manager.shutdown();
}

#[tokio::test]
async fn test_activate_writes_start_to_stdin() {
    let (mut manager, mut receiver) = script_manager("read signal; echo FIRE got $signal");
    manager.spawn(Slot::One);
    manager.activate(Slot::One);

    let line = timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("recognizer never saw the start signal")
        .unwrap();
    assert_eq!(line.line, "FIRE got start");

    manager.shutdown();
}

#[tokio::test]
async fn test_missing_program_is_nonfatal() {
    let (events, mut receiver) = mpsc::unbounded_channel();
    let mut manager = VoiceManager::new(vec!["/nonexistent/recognizer".to_string()], events);
    manager.spawn(Slot::One);
    manager.activate(Slot::One);
    manager.terminate(Slot::One);
    assert!(receiver.try_recv().is_err());
}

#[tokio::test]
async fn test_disabled_manager_never_spawns() {
    let (events, mut receiver) = mpsc::unbounded_channel();
    let mut manager = VoiceManager::disabled(events);
    manager.spawn(Slot::One);
    manager.activate(Slot::One);
    manager.shutdown();
    assert!(receiver.try_recv().is_err());
}

#[tokio::test]
async fn test_terminate_is_idempotent() {
    let (mut manager, _receiver) = script_manager("sleep 30");
    manager.spawn(Slot::Two);
    manager.terminate(Slot::Two);
    manager.terminate(Slot::Two);
    manager.shutdown();
}
