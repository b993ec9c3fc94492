pub mod image;
pub mod mahasiswa;
pub mod shared;
