pub mod assets;
pub mod compute;
pub mod entities;
