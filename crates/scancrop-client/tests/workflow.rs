//! End-to-end workflow against a mock image service.
//!
//! Walks the same sequence a front-end performs: upload, detect, crop,
//! inspect, adjust, clean up.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scancrop_client::{ImageApiClient, ImageApiConfig, ImageFile, ImageRef, ImageVariant};

fn ok_status() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": "success"}))
}

#[tokio::test]
async fn test_scan_and_crop_workflow() {
    let server = MockServer::start().await;
    let uuid = "5f0c1d9e-7a1b-4c3e-9d2f-0a1b2c3d4e5f";
    let quad = json!([[12.0, 15.0], [610.0, 9.0], [622.0, 840.0], [4.0, 851.0]]);

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuids": [uuid]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([uuid])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/image/{}/regions", uuid)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"regions": [quad.clone()]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/image/{}/crop", uuid)))
        .and(body_json(json!({"regions": [quad]})))
        .respond_with(ok_status())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/image/{}/cropped", uuid)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [format!("{}/cropped_0.jpg", uuid)]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/image/{}/cropped/0/rotate", uuid)))
        .respond_with(ok_status())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/image/{}/cropped/0", uuid)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"rotated-jpeg".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/image/{}/cropped/0", uuid)))
        .respond_with(ok_status())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/image/{}", uuid)))
        .respond_with(ok_status())
        .expect(1)
        .mount(&server)
        .await;

    let client = ImageApiClient::new(ImageApiConfig::new(server.uri()).unwrap()).unwrap();

    let uploaded = client
        .upload_images(vec![ImageFile::new("receipt.jpg", "image/jpeg", b"raw".to_vec())])
        .await
        .unwrap()
        .ok()
        .unwrap();
    let image: ImageRef = uploaded.uuids[0].clone();
    assert_eq!(image.as_str(), uuid);

    let images = client.get_images().await.unwrap().ok().unwrap();
    assert!(images.contains(&image));

    let detected = client.get_regions(&image).await.unwrap().ok().unwrap();
    assert_eq!(detected.regions.len(), 1);

    let cropped = client
        .crop_regions(&image, &detected.regions)
        .await
        .unwrap()
        .ok()
        .unwrap();
    assert!(cropped.is_success());

    let listing = client.get_cropped_images(&image).await.unwrap().ok().unwrap();
    let indices = listing.indices();
    assert_eq!(indices, vec![0]);

    assert!(client
        .rotate_cropped_image(&image, indices[0])
        .await
        .unwrap()
        .is_ok());

    let bytes = client
        .fetch_image(&image, ImageVariant::Cropped { index: indices[0] })
        .await
        .unwrap();
    assert_eq!(bytes, b"rotated-jpeg");

    assert!(client
        .delete_cropped_image(&image, indices[0])
        .await
        .unwrap()
        .is_ok());
    assert!(client.delete_image(&image).await.unwrap().is_ok());
}
