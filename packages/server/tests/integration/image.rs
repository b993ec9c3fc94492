use crate::common::{MAX_UPLOAD_SIZE, TestApp, routes};

/// A few bytes that look like the start of a PNG, including non-UTF-8 bytes.
fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    data.extend((0..=255u8).cycle().take(4096));
    data
}

mod upload {
    use super::*;

    #[tokio::test]
    async fn upload_then_download_is_byte_identical() {
        let app = TestApp::spawn().await;

        let res = app.upload("foto.png", png_bytes()).await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["message"], "Upload berhasil: foto.png");

        let file = app.get_raw(&routes::image("foto.png")).await;
        assert_eq!(file.status, 200);
        assert_eq!(file.bytes, png_bytes());
        assert_eq!(file.headers["content-type"], "image/png");
        assert_eq!(
            file.headers["content-length"],
            png_bytes().len().to_string().as_str()
        );
        assert!(
            file.headers["content-disposition"]
                .to_str()
                .unwrap()
                .starts_with("inline; filename=\"foto.png\"")
        );
    }

    #[tokio::test]
    async fn file_is_stored_under_its_name_in_data_dir() {
        let app = TestApp::spawn().await;

        app.upload("ktm.jpg", b"jpeg bytes".to_vec()).await;

        let on_disk = std::fs::read(app.data_dir.join("ktm.jpg")).unwrap();
        assert_eq!(on_disk, b"jpeg bytes");
    }

    #[tokio::test]
    async fn same_name_upload_overwrites() {
        let app = TestApp::spawn().await;

        app.upload("foto.png", b"versi pertama".to_vec()).await;
        let res = app.upload("foto.png", b"versi kedua".to_vec()).await;
        assert_eq!(res.status, 201);

        let file = app.get_raw(&routes::image("foto.png")).await;
        assert_eq!(file.bytes, b"versi kedua");
    }

    #[tokio::test]
    async fn empty_file_is_accepted() {
        let app = TestApp::spawn().await;

        let res = app.upload("kosong.txt", Vec::new()).await;
        assert_eq!(res.status, 201);

        let file = app.get_raw(&routes::image("kosong.txt")).await;
        assert_eq!(file.status, 200);
        assert!(file.bytes.is_empty());
    }

    #[tokio::test]
    async fn traversal_filenames_are_rejected() {
        let app = TestApp::spawn().await;

        for name in ["../escape.png", "..\\escape.png", ".hidden.png", ".."] {
            let res = app.upload(name, b"nope".to_vec()).await;
            assert_eq!(res.status, 400, "accepted {name:?}");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }

        assert!(!app.root.path().join("escape.png").exists());
    }

    #[tokio::test]
    async fn missing_file_field_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.upload_as("gambar", "foto.png", b"data".to_vec()).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.get_raw(&routes::image("foto.png")).await.status, 404);
    }

    #[tokio::test]
    async fn non_multipart_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::UPLOAD_IMAGE, &serde_json::json!({"file": "foto.png"}))
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .upload("besar.bin", vec![0u8; MAX_UPLOAD_SIZE as usize + 1])
            .await;

        assert_eq!(res.status, 413);
        assert_eq!(res.body["code"], "PAYLOAD_TOO_LARGE");
        assert!(!app.data_dir.join("besar.bin").exists());
    }
}

mod download {
    use super::*;

    #[tokio::test]
    async fn unknown_file_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::image("tidak-ada.png")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn encoded_traversal_is_rejected() {
        let app = TestApp::spawn().await;
        std::fs::write(app.root.path().join("rahasia.txt"), b"secret").unwrap();

        let res = app.get(&routes::image("..%2Frahasia.txt")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn non_utf8_filename_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::image("%FF.png")).await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn database_file_is_not_served() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::image("..%2Fupi.db")).await;
        assert_eq!(res.status, 400);

        let res = app.get(&routes::image(".tmp")).await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_extension_is_octet_stream() {
        let app = TestApp::spawn().await;
        app.upload("data.zzzunknown", b"abc".to_vec()).await;

        let file = app.get_raw(&routes::image("data.zzzunknown")).await;
        assert_eq!(file.status, 200);
        assert_eq!(file.headers["content-type"], "application/octet-stream");
    }
}
