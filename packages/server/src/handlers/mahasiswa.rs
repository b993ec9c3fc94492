use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{info, instrument};

use crate::entity::mahasiswa;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::models::mahasiswa::*;
use crate::models::shared::non_blank;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/daftar_mhs/",
    tag = "Mahasiswa",
    operation_id = "filterMahasiswa",
    summary = "List students filtered by province and intake year",
    description = "Returns the students whose `id_prov` and `angkatan` equal the supplied values, ordered by `nim`. \
        An omitted or blank parameter does not filter. The applied filters are echoed back under `query`.",
    params(DaftarQuery),
    responses(
        (status = 200, description = "Matching students", body = DaftarResponse),
        (status = 400, description = "Malformed query string (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn daftar_mhs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DaftarQuery>,
) -> Result<Json<DaftarResponse>, AppError> {
    let applied = DaftarQuery {
        id_prov: non_blank(query.id_prov.as_deref()).map(str::to_string),
        angkatan: non_blank(query.angkatan.as_deref()).map(str::to_string),
    };

    let mut select = mahasiswa::Entity::find();
    if let Some(ref id_prov) = applied.id_prov {
        select = select.filter(mahasiswa::Column::IdProv.eq(id_prov.as_str()));
    }
    if let Some(ref angkatan) = applied.angkatan {
        select = select.filter(mahasiswa::Column::Angkatan.eq(angkatan.as_str()));
    }

    let data = select
        .order_by_asc(mahasiswa::Column::Nim)
        .all(&state.db)
        .await?
        .into_iter()
        .map(MahasiswaResponse::from)
        .collect();

    Ok(Json(DaftarResponse {
        query: applied,
        data,
    }))
}

#[utoipa::path(
    post,
    path = "/tambah_mhs/",
    tag = "Mahasiswa",
    operation_id = "createMahasiswa",
    summary = "Create a student record",
    description = "Inserts one student. String fields are stored trimmed. Returns 409 if the `nim` is already taken.",
    request_body = MahasiswaRequest,
    responses(
        (status = 201, description = "Student created", body = StatusResponse,
            headers(("Location" = String, description = "URL of the new record"))),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "nim already exists (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(nim = %payload.nim))]
pub async fn tambah_mhs(
    State(state): State<AppState>,
    AppJson(payload): AppJson<MahasiswaRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_mahasiswa(&payload)?;

    let nim = payload.nim.trim().to_string();
    if mahasiswa::Entity::find_by_id(nim.clone())
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Mahasiswa with nim '{nim}' already exists"
        )));
    }

    let new_mhs = mahasiswa::ActiveModel {
        nim: Set(nim.clone()),
        nama: Set(payload.nama.trim().to_string()),
        id_prov: Set(payload.id_prov.trim().to_string()),
        angkatan: Set(payload.angkatan.trim().to_string()),
        tinggi_badan: Set(payload.tinggi_badan),
    };

    // A concurrent insert of the same nim surfaces as a unique violation -> 409.
    mahasiswa::Entity::insert(new_mhs)
        .exec_without_returning(&state.db)
        .await?;

    info!("Mahasiswa created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(&nim))],
        Json(StatusResponse::new(INSERT_OK)),
    ))
}

#[utoipa::path(
    get,
    path = "/tampilkan_semua_mhs/",
    tag = "Mahasiswa",
    operation_id = "listMahasiswa",
    summary = "List all students",
    description = "Returns every stored student, ordered by `nim`. No pagination.",
    responses(
        (status = 200, description = "All students", body = MahasiswaListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn tampilkan_semua_mhs(
    State(state): State<AppState>,
) -> Result<Json<MahasiswaListResponse>, AppError> {
    let data = mahasiswa::Entity::find()
        .order_by_asc(mahasiswa::Column::Nim)
        .all(&state.db)
        .await?
        .into_iter()
        .map(MahasiswaResponse::from)
        .collect();

    Ok(Json(MahasiswaListResponse { data }))
}

#[utoipa::path(
    get,
    path = "/mahasiswa/{nim}",
    tag = "Mahasiswa",
    operation_id = "getMahasiswa",
    summary = "Get a student by nim",
    params(("nim" = String, Path, description = "Student identification number")),
    responses(
        (status = 200, description = "Student details", body = MahasiswaResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_mhs(
    State(state): State<AppState>,
    AppPath(nim): AppPath<String>,
) -> Result<Json<MahasiswaResponse>, AppError> {
    let model = find_mahasiswa(&state.db, &nim).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/update_mhs_put/{nim}",
    tag = "Mahasiswa",
    operation_id = "replaceMahasiswa",
    summary = "Replace a student record",
    description = "Overwrites every mutable field of an existing student. The body `nim` must equal the path `nim`; \
        the key itself cannot be changed. Repeating the same request is idempotent.",
    params(("nim" = String, Path, description = "Student identification number")),
    request_body = MahasiswaRequest,
    responses(
        (status = 200, description = "Student replaced", body = MahasiswaResponse,
            headers(("Location" = String, description = "URL of the record"))),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_mhs_put(
    State(state): State<AppState>,
    AppPath(nim): AppPath<String>,
    AppJson(payload): AppJson<MahasiswaRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_mahasiswa(&payload)?;
    if payload.nim.trim() != nim {
        return Err(AppError::Validation(
            "nim in body must match nim in path".into(),
        ));
    }

    let txn = state.db.begin().await?;

    let existing = find_mahasiswa(&txn, &nim).await?;
    let mut active: mahasiswa::ActiveModel = existing.into();
    active.nama = Set(payload.nama.trim().to_string());
    active.id_prov = Set(payload.id_prov.trim().to_string());
    active.angkatan = Set(payload.angkatan.trim().to_string());
    active.tinggi_badan = Set(payload.tinggi_badan);

    let model = active.update(&txn).await?;
    txn.commit().await?;

    info!("Mahasiswa replaced");

    Ok((
        [(header::LOCATION, location(&model.nim))],
        Json(MahasiswaResponse::from(model)),
    ))
}

#[utoipa::path(
    patch,
    path = "/update_mhs_patch/{nim}",
    tag = "Mahasiswa",
    operation_id = "updateMahasiswa",
    summary = "Partially update a student record",
    description = "Only fields present in the body are modified; `tinggi_badan: null` clears the height. \
        An empty body returns the current record unchanged.",
    params(("nim" = String, Path, description = "Student identification number")),
    request_body = PatchMahasiswaRequest,
    responses(
        (status = 200, description = "Student updated", body = MahasiswaResponse,
            headers(("Location" = String, description = "URL of the record"))),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_mhs_patch(
    State(state): State<AppState>,
    AppPath(nim): AppPath<String>,
    AppJson(payload): AppJson<PatchMahasiswaRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_patch_mahasiswa(&payload)?;

    if payload == PatchMahasiswaRequest::default() {
        let existing = find_mahasiswa(&state.db, &nim).await?;
        return Ok((
            [(header::LOCATION, location(&existing.nim))],
            Json(MahasiswaResponse::from(existing)),
        ));
    }

    let txn = state.db.begin().await?;

    let existing = find_mahasiswa(&txn, &nim).await?;
    let mut active: mahasiswa::ActiveModel = existing.into();

    if let Some(ref nama) = payload.nama {
        active.nama = Set(nama.trim().to_string());
    }
    if let Some(ref id_prov) = payload.id_prov {
        active.id_prov = Set(id_prov.trim().to_string());
    }
    if let Some(ref angkatan) = payload.angkatan {
        active.angkatan = Set(angkatan.trim().to_string());
    }
    if let Some(tinggi_badan) = payload.tinggi_badan {
        active.tinggi_badan = Set(tinggi_badan);
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;

    info!("Mahasiswa updated");

    Ok((
        [(header::LOCATION, location(&model.nim))],
        Json(MahasiswaResponse::from(model)),
    ))
}

#[utoipa::path(
    delete,
    path = "/delete_mhs/{nim}",
    tag = "Mahasiswa",
    operation_id = "deleteMahasiswa",
    summary = "Delete a student by nim",
    description = "Deletes the student if present. Deleting an unknown `nim` also succeeds and touches no other rows.",
    params(("nim" = String, Path, description = "Student identification number")),
    responses(
        (status = 200, description = "Deleted (or already absent)", body = StatusResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_mhs(
    State(state): State<AppState>,
    AppPath(nim): AppPath<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let result = mahasiswa::Entity::delete_by_id(nim).exec(&state.db).await?;

    info!(rows_affected = result.rows_affected, "Mahasiswa deleted");

    Ok(Json(StatusResponse::new(DELETE_OK)))
}

async fn find_mahasiswa<C: ConnectionTrait>(
    db: &C,
    nim: &str,
) -> Result<mahasiswa::Model, AppError> {
    mahasiswa::Entity::find_by_id(nim.to_string())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Mahasiswa with nim '{nim}' not found")))
}
