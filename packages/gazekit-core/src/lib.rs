pub mod adapter;
mod affordance;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod grid_view;
pub mod list_view;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod widget;
pub mod widgets;

pub use adapter::{AdapterBinding, AdapterView, ChangeNotifier, DataSource, ItemCache, ItemSource, ListAdapter, Slot};
pub use config::{DwellConfig, FitStrategy, GridConfig, ListConfig};
pub use error::GeometryError;
pub use frame::{Eye, FrameContext};
pub use geometry::{Geometry, MeshBuffers};
pub use grid_view::{GridView, tile_of};
pub use list_view::ListView;
pub use render::{
    Color, colors, DrawCall, RasterSource, RasterStyle, Rasterizer, RenderBackend, RenderContext, TextureHandle,
};
pub use scene::{Scene, SceneHandle};
pub use scroll::ScrollOffset;
pub use widget::{BoxedWidget, DwellState, Widget, WidgetBase, WidgetExt, WidgetId};
pub use widgets::{Button, ButtonFace, ImageView, MeshWidget, TextLabel};

pub use glam;
pub use image;
