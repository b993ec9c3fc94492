use serde::{Deserialize, Serialize};

use crate::entity::mahasiswa;
use crate::error::AppError;

use super::shared::{double_option, validate_text};

pub const INSERT_OK: &str = "ok berhasil insert satu record";
pub const DELETE_OK: &str = "ok";

pub const NIM_MAX_LEN: usize = 32;
pub const NAMA_MAX_LEN: usize = 256;
pub const ID_PROV_MAX_LEN: usize = 16;
pub const ANGKATAN_MAX_LEN: usize = 16;

/// Full student record, used for creation and full replacement.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct MahasiswaRequest {
    #[schema(example = "1001")]
    pub nim: String,
    #[schema(example = "Budi")]
    pub nama: String,
    /// Province code.
    #[schema(example = "32")]
    pub id_prov: String,
    /// Intake year.
    #[schema(example = "2021")]
    pub angkatan: String,
    /// Height in centimetres.
    #[serde(default)]
    #[schema(example = 170)]
    pub tinggi_badan: Option<i32>,
}

/// Partial update. Omitted fields are left untouched; `tinggi_badan: null`
/// clears the stored height.
#[derive(Deserialize, Default, PartialEq, Debug, utoipa::ToSchema)]
pub struct PatchMahasiswaRequest {
    pub nama: Option<String>,
    pub id_prov: Option<String>,
    pub angkatan: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>, example = 175)]
    pub tinggi_badan: Option<Option<i32>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, utoipa::ToSchema)]
pub struct MahasiswaResponse {
    pub nim: String,
    pub nama: String,
    pub id_prov: String,
    pub angkatan: String,
    pub tinggi_badan: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MahasiswaListResponse {
    pub data: Vec<MahasiswaResponse>,
}

/// Filters for `/daftar_mhs/`. Omitted or blank values do not filter.
#[derive(Deserialize, Serialize, Default, Clone, utoipa::IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DaftarQuery {
    /// Province code to match exactly.
    pub id_prov: Option<String>,
    /// Intake year to match exactly.
    pub angkatan: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DaftarResponse {
    /// The filters that were applied.
    pub query: DaftarQuery,
    pub data: Vec<MahasiswaResponse>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatusResponse {
    #[schema(example = "ok")]
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

impl From<mahasiswa::Model> for MahasiswaResponse {
    fn from(m: mahasiswa::Model) -> Self {
        Self {
            nim: m.nim,
            nama: m.nama,
            id_prov: m.id_prov,
            angkatan: m.angkatan,
            tinggi_badan: m.tinggi_badan,
        }
    }
}

/// Canonical location of a single record.
pub fn location(nim: &str) -> String {
    format!("/mahasiswa/{nim}")
}

pub fn validate_nim(nim: &str) -> Result<(), AppError> {
    validate_text("nim", nim, NIM_MAX_LEN)?;
    // Echoed back in the Location header.
    if nim.chars().any(char::is_control) {
        return Err(AppError::Validation(
            "nim must not contain control characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_mahasiswa(req: &MahasiswaRequest) -> Result<(), AppError> {
    validate_nim(&req.nim)?;
    validate_text("nama", &req.nama, NAMA_MAX_LEN)?;
    validate_text("id_prov", &req.id_prov, ID_PROV_MAX_LEN)?;
    validate_text("angkatan", &req.angkatan, ANGKATAN_MAX_LEN)
}

pub fn validate_patch_mahasiswa(req: &PatchMahasiswaRequest) -> Result<(), AppError> {
    if let Some(ref nama) = req.nama {
        validate_text("nama", nama, NAMA_MAX_LEN)?;
    }
    if let Some(ref id_prov) = req.id_prov {
        validate_text("id_prov", id_prov, ID_PROV_MAX_LEN)?;
    }
    if let Some(ref angkatan) = req.angkatan {
        validate_text("angkatan", angkatan, ANGKATAN_MAX_LEN)?;
    }
    Ok(())
}
