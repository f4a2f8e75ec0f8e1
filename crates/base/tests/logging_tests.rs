use {
    base::logging::{FileLogger, StdoutLogger, format_timestamp, format_today},
    log::Log,
    std::fs,
};

fn record_with<'a>(args: std::fmt::Arguments<'a>) -> log::Record<'a> {
    log::RecordBuilder::new()
        .level(log::Level::Warn)
        .target("test")
        .file(Some("session.rs"))
        .line(Some(42))
        .args(args)
        .build()
}

#[test]
fn test_stdout_logger_implements_log_trait() {
    let logger = StdoutLogger;
    let metadata = log::MetadataBuilder::new()
        .level(log::Level::Info)
        .target("test")
        .build();
    assert!(logger.enabled(&metadata));
    logger.log(&record_with(format_args!("preview started")));
    logger.flush();
}

#[test]
fn test_file_logger_creates_directory() {
    let dir = std::env::temp_dir().join(format!("capture-log-test-{}-dir", std::process::id()));
    let _ = fs::remove_dir_all(&dir);

    let _logger = FileLogger::new(&dir).expect("Failed to create FileLogger");
    assert!(dir.is_dir());
    assert!(dir.join(format!("{}.log", format_today())).exists());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_file_logger_writes_formatted_line() {
    let dir = std::env::temp_dir().join(format!("capture-log-test-{}-write", std::process::id()));
    let _ = fs::remove_dir_all(&dir);

    let logger = FileLogger::new(&dir).expect("Failed to create FileLogger");
    logger.log(&record_with(format_args!("camera {} busy", 3)));
    logger.flush();

    let content = fs::read_to_string(dir.join(format!("{}.log", format_today()))).unwrap();
    let line = content.lines().last().unwrap();
    assert!(line.contains("[WARN]"), "{line}");
    assert!(line.contains("[thread:"), "{line}");
    assert!(line.contains("session.rs:42 - camera 3 busy"), "{line}");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_file_logger_appends() {
    let dir = std::env::temp_dir().join(format!("capture-log-test-{}-append", std::process::id()));
    let _ = fs::remove_dir_all(&dir);

    let logger = FileLogger::new(&dir).unwrap();
    logger.log(&record_with(format_args!("first")));
    drop(logger);
    let logger = FileLogger::new(&dir).unwrap();
    logger.log(&record_with(format_args!("second")));
    logger.flush();

    let content = fs::read_to_string(dir.join(format!("{}.log", format_today()))).unwrap();
    assert_eq!(content.lines().count(), 2);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_timestamp_shape() {
    let ts = format_timestamp();
    assert_eq!(ts.len(), 19, "{ts}");
    assert_eq!(&ts[4..5], "-");
    assert_eq!(&ts[10..11], "T");
    assert_eq!(&ts[13..14], ":");
}
