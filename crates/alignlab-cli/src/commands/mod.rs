pub mod align;
pub mod crop;
pub mod info;
pub mod preview;
pub mod score;
