use element_resolution::transport::command::CommandSnapshot;
use element_resolution::transport::session::SessionSnapshot;
use element_resolution::transport::{FileSnapshot, SnapshotProvider, StaticSnapshot, TransportError};

use crate::common::utils::fixture_path;

mod common;

#[test]
fn static_snapshot_counts_calls() {
    let mut provider = StaticSnapshot::new("uid=1 button \"Ok\"");
    assert_eq!(provider.calls(), 0);

    assert_eq!(provider.take_snapshot().expect("static"), "uid=1 button \"Ok\"");
    provider.take_snapshot().expect("static");
    assert_eq!(provider.calls(), 2);
}

#[test]
fn file_snapshot_rereads_on_every_call() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("screen.txt");
    std::fs::write(&path, "Button 'Uno' at (1, 1)").expect("write");

    let mut provider = FileSnapshot::new(&path);
    assert_eq!(provider.take_snapshot().expect("read"), "Button 'Uno' at (1, 1)");

    std::fs::write(&path, "Button 'Dos' at (2, 2)").expect("write");
    assert_eq!(provider.take_snapshot().expect("read"), "Button 'Dos' at (2, 2)");
}

#[test]
fn file_snapshot_reads_fixture() {
    let mut provider = FileSnapshot::new(fixture_path("web_login.txt"));
    let text = provider.take_snapshot().expect("fixture readable");
    assert!(text.contains("uid=5_3 link \"Ayuda\""));
}

#[test]
fn missing_snapshot_file_is_a_file_error() {
    let mut provider = FileSnapshot::new("/definitely/not/here/screen.txt");
    let err = provider.take_snapshot().expect_err("missing file");

    assert!(matches!(err, TransportError::File { .. }));
    assert!(err.to_string().contains("/definitely/not/here/screen.txt"));
}

#[test]
fn command_line_splits_program_and_args() {
    assert!(CommandSnapshot::from_command_line("   ").is_none());
    assert!(CommandSnapshot::from_command_line("adb shell dump").is_some());
}

#[test]
fn missing_program_is_a_spawn_error() {
    let mut provider = CommandSnapshot::new("definitely-not-a-real-driver-binary");
    let err = provider.take_snapshot().expect_err("spawn should fail");
    assert!(matches!(err, TransportError::Spawn { .. }));
}

#[cfg(unix)]
mod unix {
    use super::*;

    #[test]
    fn command_stdout_is_the_snapshot() {
        let mut provider = CommandSnapshot::new("echo").arg("Button 'Ok' at (1, 2)");
        let text = provider.take_snapshot().expect("echo runs");
        assert_eq!(text.trim_end(), "Button 'Ok' at (1, 2)");
    }

    #[test]
    fn failing_command_reports_status_and_stderr() {
        let mut provider = CommandSnapshot::new("sh")
            .arg("-c")
            .arg("echo device offline >&2; exit 3");
        let err = provider.take_snapshot().expect_err("exit 3");

        match err {
            TransportError::Failed { program, stderr, .. } => {
                assert_eq!(program, "sh");
                assert_eq!(stderr, "device offline");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    const DRIVER: &str = r#"
echo '{"ok":true,"ready":true}'
while read line; do
  case "$line" in
    *snapshot*) echo '{"ok":true,"text":"uid=1_6 button \"Pagar\""}' ;;
    *quit*) echo '{"ok":true}'; exit 0 ;;
  esac
done
"#;

    fn script(body: &str) -> Vec<String> {
        vec!["-c".to_string(), body.to_string()]
    }

    #[test]
    fn session_serves_repeated_snapshots() {
        let mut session = SessionSnapshot::launch("sh", &script(DRIVER)).expect("driver ready");

        for _ in 0..3 {
            let text = session.take_snapshot().expect("snapshot");
            assert_eq!(text, "uid=1_6 button \"Pagar\"");
        }

        session.quit();
        let err = session.take_snapshot().expect_err("closed session");
        assert!(matches!(err, TransportError::Closed));
    }

    #[test]
    fn session_without_ready_signal_is_rejected() {
        let result = SessionSnapshot::launch("sh", &script(r#"echo '{"ok":false}'"#));
        assert!(matches!(
            result,
            Err(TransportError::Protocol { ref command, .. }) if command == "launch"
        ));
    }

    #[test]
    fn session_driver_errors_surface_as_protocol_errors() {
        let driver = r#"
echo '{"ok":true,"ready":true}'
while read line; do
  case "$line" in
    *snapshot*) echo '{"ok":false,"error":"device offline"}' ;;
    *quit*) exit 0 ;;
  esac
done
"#;
        let mut session = SessionSnapshot::launch("sh", &script(driver)).expect("driver ready");

        match session.take_snapshot() {
            Err(TransportError::Protocol { command, error }) => {
                assert_eq!(command, "snapshot");
                assert_eq!(error, "device offline");
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[test]
    fn dead_driver_is_a_session_io_error() {
        let driver = r#"echo '{"ok":true,"ready":true}'"#;
        let mut session = SessionSnapshot::launch("sh", &script(driver)).expect("driver ready");

        // Either the write hits a closed pipe or the read sees EOF
        let err = session.take_snapshot().expect_err("driver exited");
        assert!(matches!(err, TransportError::SessionIo(_)));
    }
}
