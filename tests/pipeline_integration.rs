use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use sensor_chunk::Cli;

/// The worker socket paths are process-global (`/tmp/uds_slice_<id>.sock`),
/// so tests that actually run the worker pool must not overlap within this
/// test binary's process.
static SOCKET_PATHS: Mutex<()> = Mutex::new(());

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn write_csv(contents: &[u8]) -> tempfile::TempPath {
    let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    f.write_all(contents).unwrap();
    f.into_temp_path()
}

fn cli_for(path: PathBuf, workers: usize, subprocess: PathBuf) -> Cli {
    Cli {
        path,
        device_column: "device".to_string(),
        subprocess,
        workers: Some(workers),
        no_header_echo: false,
    }
}

#[test]
fn empty_file_is_a_fatal_error() {
    let _guard = SOCKET_PATHS.lock().unwrap();
    let f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    let cli = cli_for(f.path().to_path_buf(), 2, fixture_path("echo_subprocess.py"));
    let err = sensor_chunk::run(&cli).unwrap_err();
    assert!(matches!(err, sensor_chunk::CoreError::EmptyFile));
}

#[test]
fn missing_column_is_a_fatal_error() {
    let _guard = SOCKET_PATHS.lock().unwrap();
    let path = write_csv(b"a|b|c\n1|2|3\n");
    let mut cli = cli_for(path.to_path_buf(), 2, fixture_path("echo_subprocess.py"));
    cli.device_column = "device".to_string();
    let err = sensor_chunk::run(&cli).unwrap_err();
    assert!(matches!(err, sensor_chunk::CoreError::ColumnNotFound { .. }));
}

#[test]
fn non_csv_extension_is_rejected() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(b"id|device\n1|A\n").unwrap();
    let cli = cli_for(f.path().to_path_buf(), 2, fixture_path("echo_subprocess.py"));
    assert!(sensor_chunk::run(&cli).is_err());
}

#[test]
fn round_trip_with_identity_subprocess_tallies_header_per_chunk() {
    let _guard = SOCKET_PATHS.lock().unwrap();
    let path = write_csv(b"id|device\n1|A\n2|B\n3|A\n4|C\n5|A\n6|B\n");
    let cli = cli_for(path.to_path_buf(), 2, fixture_path("echo_subprocess.py"));
    let report = sensor_chunk::run(&cli).unwrap();

    assert_eq!(report.worker_count, 2);
    assert_eq!(report.malformed_lines, 0);
    // Each non-empty worker's echoed response re-includes the header line,
    // which the default config subtracts back out.
    assert_eq!(report.total_tally, 6);
}

#[test]
fn failing_subprocess_yields_zero_tally_for_its_chunk() {
    let _guard = SOCKET_PATHS.lock().unwrap();
    let path = write_csv(b"id|device\n1|A\n2|B\n");
    let cli = cli_for(path.to_path_buf(), 2, fixture_path("failing_subprocess.py"));
    let report = sensor_chunk::run(&cli).unwrap();

    assert_eq!(report.total_tally, 0);
    assert!(report.per_worker_tally.iter().all(|&t| t == 0));
}

#[test]
fn no_sockets_remain_after_run() {
    let _guard = SOCKET_PATHS.lock().unwrap();
    let path = write_csv(b"id|device\n1|A\n2|B\n");
    let cli = cli_for(path.to_path_buf(), 3, fixture_path("echo_subprocess.py"));
    sensor_chunk::run(&cli).unwrap();

    for id in 0..3 {
        let sock_path = format!("/tmp/uds_slice_{id}.sock");
        assert!(!std::path::Path::new(&sock_path).exists());
    }
}

#[test]
fn no_sockets_remain_after_spawn_failure() {
    let _guard = SOCKET_PATHS.lock().unwrap();
    let path = write_csv(b"id|device\n1|A\n2|B\n");
    // Points at a subprocess binary that does not exist, so every worker's
    // `Command::spawn` fails after the listener has already bound its socket.
    let cli = cli_for(path.to_path_buf(), 3, PathBuf::from("./no-such-analyze-data.py"));
    let report = sensor_chunk::run(&cli).unwrap();

    assert_eq!(report.total_tally, 0);
    for id in 0..3 {
        let sock_path = format!("/tmp/uds_slice_{id}.sock");
        assert!(!std::path::Path::new(&sock_path).exists());
    }
}
