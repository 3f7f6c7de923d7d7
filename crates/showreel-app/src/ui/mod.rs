pub mod overlay;
pub mod page;
pub mod theme;
pub mod tile;
pub mod widgets;

pub use overlay::EguiOverlay;
pub use page::Page;
pub use tile::TileTextures;
