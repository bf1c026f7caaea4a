pub mod animation;
pub mod field;
pub mod surface;

pub use animation::{Snowfall, SnowfallHandle};
pub use field::{SnowField, Snowflake, Viewport};
pub use surface::{CharSurface, Rgba, Surface};
