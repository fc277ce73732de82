//! Integration tests for `ImageConverter::convert` against mocked image hosts
//! and a mocked remote conversion service.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use prodimg_core::ErrorKind;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prodimg_convert::{ConvertError, ConverterBackend, EncodedImage, ImageConverter};

fn local_converter() -> ImageConverter {
    ImageConverter::new(5, "prodimg-test/0.1").expect("failed to build test ImageConverter")
}

fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(32, 32, Rgb([200, 30, 30]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("png fixture encodes");
    buf
}

// ---------------------------------------------------------------------------
// Local backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn local_convert_downloads_and_encodes_webp() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/2212.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(png_bytes()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/images/2212.png", server.uri());
    let encoded = local_converter().convert(&url, 80).await;

    assert!(encoded.is_ok(), "expected Ok, got: {encoded:?}");
    let encoded = encoded.unwrap();
    assert!(encoded.size_bytes() > 0);
    let decoded = image::load_from_memory_with_format(encoded.bytes(), ImageFormat::WebP)
        .expect("output decodes as webp");
    assert_eq!(decoded.width(), 32);
}

#[tokio::test]
async fn local_convert_maps_missing_image_to_download_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/images/missing.png", server.uri());
    let err = local_converter().convert(&url, 80).await.unwrap_err();

    assert!(
        matches!(err, ConvertError::DownloadStatus { status: 404, .. }),
        "expected DownloadStatus(404), got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::DownloadError);
}

#[tokio::test]
async fn local_convert_maps_unreachable_host_to_download_error() {
    // Port 9 (discard) is closed on test hosts.
    let err = local_converter()
        .convert("http://127.0.0.1:9/nope.png", 80)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DownloadError, "got: {err:?}");
}

#[tokio::test]
async fn local_convert_maps_non_image_body_to_encode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/page.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hello</html>"))
        .mount(&server)
        .await;

    let url = format!("{}/images/page.html", server.uri());
    let err = local_converter().convert(&url, 80).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EncodeError, "got: {err:?}");
}

#[tokio::test]
async fn invalid_quality_makes_no_network_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes()))
        .expect(0)
        .mount(&server)
        .await;

    let url = format!("{}/images/2212.png", server.uri());
    let err = local_converter().convert(&url, 0).await.unwrap_err();

    assert!(matches!(err, ConvertError::InvalidQuality(0)), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::EncodeError);
}

// ---------------------------------------------------------------------------
// Remote backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remote_convert_decodes_service_payload() {
    let server = MockServer::start().await;
    let webp = EncodedImage::new(b"RIFF\x10\x00\x00\x00WEBPVP8 ".to_vec());

    Mock::given(method("POST"))
        .and(path("/convert"))
        .and(body_json(json!({
            "imageUrl": "https://cdn.example.com/2212.png",
            "quality": 75
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "format": "webp",
            "size": webp.size_bytes(),
            "base64": webp.to_base64(),
            "dataUrl": webp.data_url()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let converter = local_converter().with_remote_backend(&format!("{}/convert", server.uri()));
    assert!(matches!(converter.backend(), ConverterBackend::Remote { .. }));

    let encoded = converter
        .convert("https://cdn.example.com/2212.png", 75)
        .await
        .expect("remote conversion should succeed");
    assert_eq!(encoded, webp);
}

#[tokio::test]
async fn remote_failure_without_kind_is_encode_error_with_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Conversion failed",
            "message": "unsupported image"
        })))
        .mount(&server)
        .await;

    let converter = local_converter().with_remote_backend(&format!("{}/convert", server.uri()));
    let err = converter
        .convert("https://cdn.example.com/2212.png", 80)
        .await
        .unwrap_err();

    assert!(
        matches!(err, ConvertError::Remote { status: 500, ref message, kind: None } if message == "unsupported image"),
        "expected Remote(500), got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::EncodeError);
}

#[tokio::test]
async fn remote_failure_keeps_reported_download_kind() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Conversion failed",
            "message": "getaddrinfo ENOTFOUND unreachable.invalid",
            "kind": "DownloadError"
        })))
        .mount(&server)
        .await;

    let converter = local_converter().with_remote_backend(&format!("{}/convert", server.uri()));
    let err = converter
        .convert("http://unreachable.invalid/a.png", 80)
        .await
        .unwrap_err();

    assert!(
        matches!(err, ConvertError::Remote { status: 500, .. }),
        "expected Remote(500), got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::DownloadError);
}

#[tokio::test]
async fn remote_bad_base64_is_encode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "format": "webp",
            "size": 3,
            "base64": "!!!not base64!!!",
            "dataUrl": ""
        })))
        .mount(&server)
        .await;

    let converter = local_converter().with_remote_backend(&format!("{}/convert", server.uri()));
    let err = converter
        .convert("https://cdn.example.com/2212.png", 80)
        .await
        .unwrap_err();

    assert!(matches!(err, ConvertError::RemotePayload(_)), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::EncodeError);
}

#[tokio::test]
async fn remote_unreachable_service_is_download_error() {
    let converter = local_converter().with_remote_backend("http://127.0.0.1:9/convert");
    let err = converter
        .convert("https://cdn.example.com/2212.png", 80)
        .await
        .unwrap_err();

    assert!(
        matches!(err, ConvertError::RemoteTransport { .. }),
        "got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::DownloadError);
}
