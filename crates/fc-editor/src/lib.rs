pub mod canvas;
pub mod gate;
pub mod input;
pub mod mirror;
pub mod selection;
