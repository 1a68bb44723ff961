use std::path::PathBuf;

pub const DEFAULT_DISPLAY_SIZE: u32 = 600;
pub const DEFAULT_MAX_DIMENSION: u32 = 16_384;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Edge length of the square display frame, in pixels.
    pub display_size: u32,
    /// Largest canvas edge `new` accepts.
    pub max_dimension: u32,
    /// Where the preview presenter writes the display frame, if enabled.
    pub preview_path: Option<PathBuf>,
    pub banner: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            display_size: DEFAULT_DISPLAY_SIZE,
            max_dimension: DEFAULT_MAX_DIMENSION,
            preview_path: None,
            banner: true,
        }
    }
}
