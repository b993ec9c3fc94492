use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(mahasiswa_routes())
        .merge(image_routes(config))
}

fn mahasiswa_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::mahasiswa::daftar_mhs))
        .routes(routes!(handlers::mahasiswa::tambah_mhs))
        .routes(routes!(handlers::mahasiswa::tampilkan_semua_mhs))
        .routes(routes!(handlers::mahasiswa::get_mhs))
        .routes(routes!(handlers::mahasiswa::update_mhs_put))
        .routes(routes!(handlers::mahasiswa::update_mhs_patch))
        .routes(routes!(handlers::mahasiswa::delete_mhs))
}

fn image_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::image::upload_image))
        .layer(handlers::image::upload_body_limit(
            config.storage.max_upload_size,
        ));

    OpenApiRouter::new()
        .routes(routes!(handlers::image::get_image))
        .merge(upload)
}
