use cookidump::fetchers::ImageFetcher;
use cookidump::ScrapeError;
use std::time::Duration;

#[tokio::test]
async fn test_download_writes_file() {
    let mut server = mockito::Server::new_async().await;
    let body = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    let _m = server
        .mock("GET", "/images/r1.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(body.clone())
        .create();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("images").join("r1.jpg");
    let fetcher = ImageFetcher::new(Some(Duration::from_secs(5))).unwrap();

    let written = fetcher
        .download(&format!("{}/images/r1.jpg", server.url()), &path)
        .await
        .unwrap();

    assert_eq!(written, body.len());
    assert_eq!(std::fs::read(&path).unwrap(), body);
}

#[tokio::test]
async fn test_download_fails_on_http_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/images/missing.jpg")
        .with_status(404)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.jpg");
    let fetcher = ImageFetcher::new(None).unwrap();

    let result = fetcher
        .download(&format!("{}/images/missing.jpg", server.url()), &path)
        .await;

    assert!(matches!(result, Err(ScrapeError::Fetch(_))));
    assert!(!path.exists());
}
