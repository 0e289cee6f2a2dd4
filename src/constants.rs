// Page hooks and drawing sizes for the board. Ids and attribute names match
// the markup in `index.html`; sizes are CSS pixels.

// Page structure
pub const BOARD_ID: &str = "backgroundArea";
pub const BACKGROUND_IMG_ID: &str = "backgroundImage";
pub const PREV_BG_BUTTON_ID: &str = "prevBgBtn";
pub const NEXT_BG_BUTTON_ID: &str = "nextBgBtn";
pub const RESET_BUTTON_ID: &str = "resetBtn";
pub const ZONE_SELECTOR: &str = ".zone";
pub const TEMPLATE_SELECTOR: &str = ".zone img";

// Data attributes
pub const ATTR_ZONE: &str = "data-zone";
pub const ATTR_ELEMENT_ID: &str = "data-element-id";
pub const ATTR_CONNECTOR_ID: &str = "data-connector-id";
pub const ATTR_END: &str = "data-end";

// Classes
pub const PLACED_CLASS: &str = "draggable-image";
pub const OVERLAY_CLASS: &str = "positioned-image";
pub const DRAGGING_CLASS: &str = "dragging";
pub const HIGHLIGHT_CLASS: &str = "magnet-target";
pub const MARKER_CLASS: &str = "cable-end";
pub const RELEASABLE_CLASS: &str = "releasable";

// Assets
pub const OVERLAY_DIR: &str = "ImagesPourFond";
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

// Cable drawing
pub const CABLE_STROKE_WIDTH: f32 = 3.0;
pub const MARKER_RADIUS: f32 = 8.0;

// Stacking order inside the board
pub const Z_OVERLAY: i32 = 5;
pub const Z_CABLES: i32 = 10;
pub const Z_ELEMENT: i32 = 20;
pub const Z_DRAGGING: i32 = 1000;
