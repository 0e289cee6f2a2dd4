// Shared tuning constants for the board. Distances are canvas pixels.

// Cable shape
pub const CURVE_SAMPLE_COUNT: usize = 20; // parameter steps used for proximity scans
pub const FALLEN_SAG_FRACTION: f32 = 0.05; // droop of a hanging cable, fraction of its vertical drop
pub const LINKED_PAIR_SAG_PERCENT: f32 = 60.0; // element-to-element cables hang deep
pub const DEFAULT_CABLE_COLOR: &str = "#27ae60";

// Interaction radii
pub const DETACH_CAPTURE_RADIUS: f32 = 20.0; // one-shot snap when a cable end is released
pub const MAGNET_RADIUS: f32 = 50.0; // continuous hover while dragging

// Animation
pub const FALL_DURATION_MS: f64 = 1500.0;

// Placement
pub const FIT_MARGIN: f32 = 0.95; // oversized elements shrink to 95% of the available room
pub const PAIR_VIEWPORT_FRACTION: f32 = 0.20; // gap below the first copy of a linked pair
pub const PAIR_TOP_MARGIN: f32 = 70.0; // y of the top-centred copy variant
pub const PAIR_FALLBACK_WIDTH: f32 = 100.0;

// Backgrounds
pub const LAYOUT_MIN_BACKGROUND: u32 = 30; // overlay layouts only exist from this index on
pub const MAX_BACKGROUND_PROBES: u32 = 20;

// Template palette, keyed by asset stem
pub const TEMPLATE_CABLE_COLORS: [(&str, &str); 5] = [
    ("image (1)", "#26ff4eff"),
    ("image (2)", "#14d531ff"),
    ("image (3)", "#0599efff"),
    ("image (4)", "#477a73ff"),
    ("image (5)", "#cc9f0aec"),
];

#[inline]
pub fn cable_color_for_asset(stem: &str) -> &'static str {
    TEMPLATE_CABLE_COLORS
        .iter()
        .find(|(name, _)| *name == stem)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_CABLE_COLOR)
}

