use serde::{Deserialize, Serialize};

/// Multipart body of `POST /uploadimage`.
#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
pub struct UploadImageForm {
    /// The image to store. Its filename becomes the retrieval key.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(example = "Upload berhasil: foto.png")]
    pub message: String,
}

impl UploadResponse {
    pub fn uploaded(filename: &str) -> Self {
        Self {
            message: format!("Upload berhasil: {filename}"),
        }
    }
}
