use ris_core::traits::ImageLoader;
use ris_search::FsImageLoader;

#[test]
fn reads_relative_and_absolute_references() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("chair.jpg"), b"jpeg").unwrap();
    let loader = FsImageLoader::new(tmp.path());

    assert_eq!(loader.load("chair.jpg").unwrap(), b"jpeg");
    let absolute = tmp.path().join("chair.jpg");
    assert_eq!(FsImageLoader::new("/elsewhere").load(absolute.to_str().unwrap()).unwrap(), b"jpeg");
}

#[test]
fn rejects_remote_blank_and_missing_references() {
    let tmp = tempfile::tempdir().unwrap();
    let loader = FsImageLoader::new(tmp.path());
    assert!(loader.load("https://cdn.example.com/chair.jpg").is_err());
    assert!(loader.load("  ").is_err());
    assert!(loader.load("missing.jpg").is_err());
}
