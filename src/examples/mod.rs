pub mod prova;
