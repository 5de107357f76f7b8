pub mod agenda;

pub use agenda::generate_agenda;
