pub mod assets;
pub mod sections;
