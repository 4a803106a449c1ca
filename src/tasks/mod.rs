pub mod pirates;
