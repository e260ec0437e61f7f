pub mod headless;
pub mod raster;
pub mod vertex;

pub use headless::{DrawRecord, HeadlessRenderer};
pub use raster::SolidRasterizer;
pub use vertex::{DrawUniforms, Vertex, interleave};
