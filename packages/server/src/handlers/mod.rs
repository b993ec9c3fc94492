pub mod image;
pub mod mahasiswa;
