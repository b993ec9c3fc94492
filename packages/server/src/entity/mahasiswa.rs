use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mahasiswa")]
pub struct Model {
    /// Student identification number.
    #[sea_orm(primary_key, auto_increment = false)]
    pub nim: String,

    pub nama: String,
    pub id_prov: String, // province code
    pub angkatan: String, // intake year

    pub tinggi_badan: Option<i32>, // in centimetres
}

impl ActiveModelBehavior for ActiveModel {}
