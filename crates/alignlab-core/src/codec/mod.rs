//! Image file I/O: decode with EXIF orientation, PNG encode, discovery.

pub mod load;
pub mod save;

pub use load::{
    decode_frame, discover_images, is_supported_image, load_frame, LoadError, Orientation,
    SUPPORTED_EXTENSIONS,
};
pub use save::{encode_png, save_png, SaveError};
