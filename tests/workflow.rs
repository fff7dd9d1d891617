//! End-to-end checks through the public API: the read path (scan, load,
//! merge), the reorder path (build, save), and the thumbnail pipeline on
//! real image files.

use image::{ImageFormat, RgbImage};
use picture_order::config::{GalleryConfig, UrlConfig, load_config};
use picture_order::merge::merge;
use picture_order::order::{OrderError, OrderStore, build_order};
use picture_order::scan::scan;
use picture_order::thumbnails::{self, PipelineConfig, PipelineEvent};
use picture_order::types::Picture;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 90])
    });
    image::DynamicImage::ImageRgb8(img)
        .save_with_format(path, format)
        .unwrap();
}

/// A gallery rooted in a temp dir, configured through a real config file.
fn gallery(tmp: &TempDir) -> GalleryConfig {
    let root = tmp.path();
    let config_path = root.join("picture-order.toml");
    fs::write(
        &config_path,
        format!(
            r#"
pictures_dir = "{root}/pictures"
thumbnails_dir = "{root}/pictures/thumbnails"
order_file = "{root}/data/order.json"

[thumbnails]
size = 32
batch_size = 2
"#,
            root = root.display()
        ),
    )
    .unwrap();
    let config = load_config(&config_path).unwrap();
    fs::create_dir_all(&config.pictures_dir).unwrap();
    config
}

fn read_sequence(config: &GalleryConfig) -> Vec<Picture> {
    let current = scan(&config.pictures_dir, &config.urls);
    let saved = OrderStore::new(&config.order_file).load();
    merge(current, &saved)
}

fn names(pictures: &[Picture]) -> Vec<&str> {
    pictures.iter().map(|p| p.filename.as_str()).collect()
}

fn add(config: &GalleryConfig, name: &str) {
    write_image(&config.pictures_dir.join(name), 40, 30, format_for(name));
}

fn format_for(name: &str) -> ImageFormat {
    ImageFormat::from_path(name).unwrap()
}

fn reorder(config: &GalleryConfig, order: &[&str]) -> Result<(), OrderError> {
    let current = scan(&config.pictures_dir, &config.urls);
    let requested: Vec<String> = order.iter().map(|s| s.to_string()).collect();
    let record = build_order(&current, &requested)?;
    OrderStore::new(&config.order_file).save(&record)?;
    Ok(())
}

#[test]
fn first_run_lists_pictures_by_filename() {
    let tmp = TempDir::new().unwrap();
    let config = gallery(&tmp);
    for name in ["c.png", "a.jpg", "b.gif"] {
        add(&config, name);
    }

    let pictures = read_sequence(&config);

    assert_eq!(names(&pictures), vec!["a.jpg", "b.gif", "c.png"]);
    assert_eq!(
        pictures.iter().map(|p| p.order).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(!config.order_file.exists());
}

#[test]
fn reorder_survives_additions_and_deletions() {
    let tmp = TempDir::new().unwrap();
    let config = gallery(&tmp);
    for name in ["a.jpg", "b.png", "c.webp"] {
        add(&config, name);
    }

    reorder(&config, &["c.webp", "a.jpg", "b.png"]).unwrap();
    assert_eq!(
        names(&read_sequence(&config)),
        vec!["c.webp", "a.jpg", "b.png"]
    );

    // New file goes to the end, deleted file disappears
    add(&config, "0-new.jpg");
    fs::remove_file(config.pictures_dir.join("a.jpg")).unwrap();

    let pictures = read_sequence(&config);
    assert_eq!(names(&pictures), vec!["c.webp", "b.png", "0-new.jpg"]);
    assert_eq!(
        pictures.iter().map(|p| p.order).collect::<Vec<_>>(),
        vec![0, 2, 3]
    );
}

#[test]
fn rejected_reorder_leaves_file_untouched() {
    let tmp = TempDir::new().unwrap();
    let config = gallery(&tmp);
    add(&config, "a.jpg");
    add(&config, "b.jpg");
    reorder(&config, &["b.jpg", "a.jpg"]).unwrap();
    let before = fs::read_to_string(&config.order_file).unwrap();

    let err = reorder(&config, &["b.jpg", "ghost.jpg"]).unwrap_err();

    assert!(matches!(err, OrderError::UnknownFilenames(ref n) if n == &["ghost.jpg"]));
    assert_eq!(fs::read_to_string(&config.order_file).unwrap(), before);
}

#[test]
fn corrupt_order_file_falls_back_to_scan_order() {
    let tmp = TempDir::new().unwrap();
    let config = gallery(&tmp);
    add(&config, "b.jpg");
    add(&config, "a.jpg");
    fs::create_dir_all(config.order_file.parent().unwrap()).unwrap();
    fs::write(&config.order_file, "[[[").unwrap();

    assert_eq!(names(&read_sequence(&config)), vec!["a.jpg", "b.jpg"]);

    // The next save repairs the file
    reorder(&config, &["b.jpg", "a.jpg"]).unwrap();
    assert_eq!(names(&read_sequence(&config)), vec!["b.jpg", "a.jpg"]);
}

#[test]
fn legacy_order_file_is_read() {
    let tmp = TempDir::new().unwrap();
    let config = gallery(&tmp);
    add(&config, "a.jpg");
    add(&config, "b.jpg");
    fs::create_dir_all(config.order_file.parent().unwrap()).unwrap();
    fs::write(
        &config.order_file,
        r#"{
  "version": "1.0.0",
  "lastUpdated": "2024-05-01T10:00:00.000Z",
  "pictures": [
    {"filename": "b.jpg", "path": "/pictures/b.jpg", "thumbnailPath": "/pictures/thumbnails/b.jpg", "order": 0},
    {"filename": "a.jpg", "path": "/pictures/a.jpg", "thumbnailPath": "/pictures/thumbnails/a.jpg", "order": 1}
  ]
}"#,
    )
    .unwrap();

    assert_eq!(names(&read_sequence(&config)), vec!["b.jpg", "a.jpg"]);
}

#[test]
fn saved_file_holds_positions_only() {
    let tmp = TempDir::new().unwrap();
    let config = gallery(&tmp);
    add(&config, "a.jpg");
    reorder(&config, &["a.jpg"]).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config.order_file).unwrap()).unwrap();
    assert_eq!(json["formatVersion"], "1.0.0");
    assert_eq!(
        json["entries"],
        serde_json::json!([{"filename": "a.jpg", "order": 0}])
    );
}

#[test]
fn listing_json_uses_camel_case_and_url_prefixes() {
    let tmp = TempDir::new().unwrap();
    let config = gallery(&tmp);
    add(&config, "loop.gif");

    let pictures = read_sequence(&config);
    let json = serde_json::to_value(&pictures).unwrap();

    let urls = UrlConfig::default();
    assert_eq!(json[0]["path"], format!("{}/loop.gif", urls.pictures));
    assert_eq!(
        json[0]["thumbnailPath"],
        format!("{}/loop.png", urls.thumbnails)
    );
    assert_eq!(json[0]["metadata"]["mimeType"], "image/gif");
}

#[test]
fn thumbnails_for_every_scanned_picture() {
    let tmp = TempDir::new().unwrap();
    let config = gallery(&tmp);
    for name in ["a.jpg", "b.png", "c.gif", "d.webp", "e.jpeg"] {
        add(&config, name);
    }
    fs::write(config.pictures_dir.join("broken.jpg"), b"garbage").unwrap();
    fs::write(config.pictures_dir.join("notes.txt"), b"ignored").unwrap();

    let (tx, rx) = std::sync::mpsc::channel();
    let summary =
        thumbnails::run(&PipelineConfig::from_gallery_config(&config), Some(tx)).unwrap();

    assert_eq!(summary.generated, 5);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.batches, 3);

    let events: Vec<PipelineEvent> = rx.iter().collect();
    assert!(matches!(
        events.first(),
        Some(PipelineEvent::Started {
            total: 6,
            batches: 3
        })
    ));

    // Every listed thumbnail URL points at a file the pipeline wrote
    for picture in read_sequence(&config) {
        if picture.filename == "broken.jpg" {
            continue;
        }
        let name = picture.thumbnail_path.rsplit('/').next().unwrap();
        let path = config.thumbnails_dir.join(name);
        assert_eq!(image::image_dimensions(&path).unwrap(), (32, 32), "{name}");
    }
}
