//! Colours of the scene and the ornament theme mapping

use glam::Vec3;
use tracing::debug;

use crate::instances::InstanceSink;
use crate::state::ThemeColor;

/// Gold every third ornament keeps regardless of theme
pub const ACCENT_GOLD: u32 = 0xD4AF37;

pub const EMERALD: u32 = 0x004D40;
pub const EMERALD_DEEP: u32 = 0x001A14;
pub const BACKGROUND: u32 = 0x000504;
pub const BARK: u32 = 0x3E2723;
pub const BULB: u32 = 0xFFFFEE;
pub const BULB_GLOW: u32 = 0xFFCC00;
pub const WARM_KEY: u32 = 0xFFDDAA;
pub const AMBER_RIM: u32 = 0xCA8A04;
pub const WHITE: u32 = 0xFFFFFF;
pub const SPARKLE_WARM: u32 = 0xFFEEAA;
pub const SPARKLE_ROSE: u32 = 0xFFAAAA;

/// Convert a `0xRRGGBB` literal to RGB floats in `[0, 1]`
pub fn hex(rgb: u32) -> Vec3 {
    Vec3::new(
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
    )
}

impl ThemeColor {
    /// Colour of the themed (non-accent) ornaments
    pub fn ornament_hex(&self) -> u32 {
        match self {
            ThemeColor::Gold => 0xF4CF57,
            ThemeColor::Silver => 0xE0E0E0,
            ThemeColor::Ruby => 0x800020,
        }
    }

    pub fn sparkle_hex(&self) -> u32 {
        match self {
            ThemeColor::Ruby => SPARKLE_ROSE,
            _ => SPARKLE_WARM,
        }
    }
}

/// Colour of ornament `index` under `theme`
pub fn ornament_color(index: usize, theme: ThemeColor) -> Vec3 {
    if index % 3 == 0 {
        hex(ACCENT_GOLD)
    } else {
        hex(theme.ornament_hex())
    }
}

/// Write every ornament colour, then signal the sink once
pub fn paint_ornaments<S: InstanceSink + ?Sized>(sink: &mut S, theme: ThemeColor) {
    let count = sink.instance_count();
    for i in 0..count {
        sink.set_color_at(i, ornament_color(i, theme));
    }
    sink.mark_colors_dirty();
    debug!(%theme, count, "painted ornaments");
}
