use {
    base::Vec2,
    capture::{CameraError, Facing, SessionConfig},
    std::{path::PathBuf, time::Duration},
};

#[test]
fn test_defaults() {
    let config = SessionConfig::builder().build().unwrap();
    assert!(!config.aspect().is_set());
    assert_eq!(config.output_path(), None);
    assert_eq!(config.storage_dir(), std::env::temp_dir().as_path());
    assert_eq!(config.facing(), Facing::Back);
    assert_eq!(config.jpeg_quality(), 100);
    assert_eq!(config.max_preview(), Vec2::new(1920, 1080));
    assert_eq!(config.lock_timeout(), Duration::from_millis(2500));
}

#[test]
fn test_builder_setters() {
    let config = SessionConfig::builder()
        .with_aspect_ratio(4.0 / 3.0)
        .with_aspect_ratio_tolerance(0.05)
        .with_output_path("/sdcard/DCIM/shot.jpg")
        .with_facing(Facing::Front)
        .with_jpeg_quality(85)
        .with_max_preview(1280, 720)
        .with_lock_timeout(Duration::from_millis(500))
        .build()
        .unwrap();
    assert_eq!(config.aspect().ratio(), Some(4.0 / 3.0));
    assert_eq!(config.aspect().tolerance(), 0.05);
    assert_eq!(
        config.output_path(),
        Some(PathBuf::from("/sdcard/DCIM/shot.jpg").as_path())
    );
    assert_eq!(config.facing(), Facing::Front);
    assert_eq!(config.jpeg_quality(), 85);
    assert_eq!(config.max_preview(), Vec2::new(1280, 720));
    assert_eq!(config.lock_timeout(), Duration::from_millis(500));
}

#[test]
fn test_ratio_below_one_rejected() {
    let result = SessionConfig::builder().with_aspect_ratio(0.75).build();
    assert!(matches!(result, Err(CameraError::InvalidConfig(_))));
}

#[test]
fn test_non_finite_ratio_rejected() {
    let result = SessionConfig::builder().with_aspect_ratio(f64::NAN).build();
    assert!(matches!(result, Err(CameraError::InvalidConfig(_))));
}

#[test]
fn test_negative_tolerance_rejected() {
    let result = SessionConfig::builder()
        .with_aspect_ratio(1.5)
        .with_aspect_ratio_tolerance(-0.1)
        .build();
    assert!(matches!(result, Err(CameraError::InvalidConfig(_))));
}

#[test]
fn test_empty_output_path_rejected() {
    let result = SessionConfig::builder().with_output_path("").build();
    assert!(matches!(result, Err(CameraError::InvalidConfig(_))));
}

#[test]
fn test_jpeg_quality_range() {
    for quality in [0, 101, 255] {
        let result = SessionConfig::builder().with_jpeg_quality(quality).build();
        assert!(matches!(result, Err(CameraError::InvalidConfig(_))), "quality {quality}");
    }
    for quality in [1, 50, 100] {
        assert!(SessionConfig::builder().with_jpeg_quality(quality).build().is_ok());
    }
}

#[test]
fn test_zero_max_preview_rejected() {
    let result = SessionConfig::builder().with_max_preview(0, 1080).build();
    assert!(matches!(result, Err(CameraError::InvalidConfig(_))));
}

#[test]
fn test_next_image_path_uses_output_path() {
    let config = SessionConfig::builder()
        .with_output_path("/tmp/fixed.jpg")
        .build()
        .unwrap();
    assert_eq!(config.next_image_path(), PathBuf::from("/tmp/fixed.jpg"));
    assert_eq!(config.next_image_path(), PathBuf::from("/tmp/fixed.jpg"));
}

#[test]
fn test_next_image_path_in_storage_dir() {
    let config = SessionConfig::builder()
        .with_storage_dir("/var/pictures")
        .build()
        .unwrap();
    let path = config.next_image_path();
    assert_eq!(path.parent(), Some(PathBuf::from("/var/pictures").as_path()));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap();
    assert!(stem.parse::<u128>().is_ok(), "{stem} is not a timestamp");
}
