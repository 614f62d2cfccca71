//! Whole-process shutdown: the binaries must exit on every terminal path
//! even while stdin is still open.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const EXIT_DEADLINE: Duration = Duration::from_secs(15);

/// MQTT CONNACK, session not present, return code 0.
const CONNACK: [u8; 4] = [0x20, 0x02, 0x00, 0x00];

fn write_config(name: &str, port: u16, extra: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "smartgarden_process_{}_{name}.json",
        std::process::id()
    ));
    let body = format!(
        r#"{{"broker_host":"127.0.0.1","broker_port":{port},"refresh_interval_ms":100{extra}}}"#
    );
    std::fs::write(&path, body).unwrap();
    path
}

fn launch(binary: &str, config: &PathBuf) -> Child {
    Command::new(binary)
        .arg(config)
        .env("RUST_LOG", "info")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap()
}

fn wait_for_exit(child: &mut Child) -> Option<ExitStatus> {
    let start = Instant::now();
    while start.elapsed() < EXIT_DEADLINE {
        if let Some(status) = child.try_wait().unwrap() {
            return Some(status);
        }
        thread::sleep(Duration::from_millis(50));
    }
    let _ = child.kill();
    let _ = child.wait();
    None
}

/// Port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Accepts one client, answers its CONNECT and then swallows everything.
fn fake_broker() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else { return };
        let mut buf = [0u8; 512];
        if !matches!(stream.read(&mut buf), Ok(n) if n > 0) {
            return;
        }
        if stream.write_all(&CONNACK).is_err() {
            return;
        }
        while matches!(stream.read(&mut buf), Ok(n) if n > 0) {}
    });
    port
}

#[test]
fn dashboard_exits_when_broker_unreachable_with_stdin_open() {
    let config = write_config("dash_unreachable", closed_port(), "");
    let mut child = launch(env!("CARGO_BIN_EXE_garden-dashboard"), &config);
    let _stdin = child.stdin.take();

    let status = wait_for_exit(&mut child);
    let _ = std::fs::remove_file(&config);

    let status = status.expect("dashboard kept running after a failed first connect");
    assert!(!status.success());
}

#[test]
fn dashboard_exits_on_quit_with_stdin_open() {
    let config = write_config("dash_quit", fake_broker(), "");
    let mut child = launch(env!("CARGO_BIN_EXE_garden-dashboard"), &config);
    let mut stdin = child.stdin.take().unwrap();

    thread::sleep(Duration::from_millis(300));
    stdin.write_all(b"quit\n").unwrap();
    stdin.flush().unwrap();

    let status = wait_for_exit(&mut child);
    let _ = std::fs::remove_file(&config);
    drop(stdin);

    let status = status.expect("dashboard kept running after quit");
    assert!(status.success());
}

#[test]
fn controller_exits_when_model_missing() {
    let config = write_config(
        "ctrl_missing_model",
        closed_port(),
        r#","model_path":"/nonexistent/smart_garden_model.json""#,
    );
    let mut child = launch(env!("CARGO_BIN_EXE_garden-controller"), &config);

    let status = wait_for_exit(&mut child);
    let _ = std::fs::remove_file(&config);

    assert!(!status.expect("controller kept running").success());
}

#[test]
fn controller_exits_when_broker_unreachable() {
    let model = concat!(env!("CARGO_MANIFEST_DIR"), "/models/smart_garden_model.json");
    let config = write_config(
        "ctrl_unreachable",
        closed_port(),
        &format!(r#","model_path":"{model}""#),
    );
    let mut child = launch(env!("CARGO_BIN_EXE_garden-controller"), &config);

    let status = wait_for_exit(&mut child);
    let _ = std::fs::remove_file(&config);

    assert!(!status.expect("controller kept running").success());
}
