//! Color model: RGBA values, the 16- and 256-entry palettes, and the
//! "default fg"/"default bg" sentinels that resolve only at render time.

/// A resolved RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }
}

/// The default foreground color, used when [`Color::Default`] resolves
/// against no explicit palette override. Chosen to be legible on the
/// default background without being pure white.
pub const DEFAULT_FG: Rgba = Rgba::rgb(0xCC, 0xCC, 0xCC);
/// The default background color.
pub const DEFAULT_BG: Rgba = Rgba::rgb(0x00, 0x00, 0x00);

/// A cell or SGR color, stored unresolved so the same value survives a
/// palette swap (e.g. a future "reload theme" operation) without having to
/// walk every cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// The terminal's default fg/bg sentinel ("no color set").
    #[default]
    Default,
    /// An index into the combined 256-entry palette (0-15 are the ANSI
    /// normal/bright 16, 16-231 are the 6x6x6 cube, 232-255 are grayscale).
    Indexed(u8),
    /// A direct truecolor value (SGR `38;2;r;g;b` / `48;2;r;g;b`).
    Rgb(Rgba),
}

impl Color {
    /// Resolve to a concrete RGBA value against `palette`, using `default`
    /// for [`Color::Default`].
    #[must_use]
    pub fn resolve(self, palette: &Palette256, default: Rgba) -> Rgba {
        match self {
            Color::Default => default,
            Color::Indexed(i) => palette.entry(i),
            Color::Rgb(rgba) => rgba,
        }
    }
}

/// The 16 ANSI colors (normal 0-7, bright 8-15), xterm's default values.
pub const PALETTE_16: [Rgba; 16] = [
    Rgba::rgb(0x00, 0x00, 0x00), // black
    Rgba::rgb(0xCD, 0x00, 0x00), // red
    Rgba::rgb(0x00, 0xCD, 0x00), // green
    Rgba::rgb(0xCD, 0xCD, 0x00), // yellow
    Rgba::rgb(0x00, 0x00, 0xEE), // blue
    Rgba::rgb(0xCD, 0x00, 0xCD), // magenta
    Rgba::rgb(0x00, 0xCD, 0xCD), // cyan
    Rgba::rgb(0xE5, 0xE5, 0xE5), // white
    Rgba::rgb(0x7F, 0x7F, 0x7F), // bright black
    Rgba::rgb(0xFF, 0x00, 0x00), // bright red
    Rgba::rgb(0x00, 0xFF, 0x00), // bright green
    Rgba::rgb(0xFF, 0xFF, 0x00), // bright yellow
    Rgba::rgb(0x5C, 0x5C, 0xFF), // bright blue
    Rgba::rgb(0xFF, 0x00, 0xFF), // bright magenta
    Rgba::rgb(0x00, 0xFF, 0xFF), // bright cyan
    Rgba::rgb(0xFF, 0xFF, 0xFF), // bright white
];

/// The full 256-entry xterm-compatible palette: the 16 ANSI colors, a
/// 6x6x6 color cube, and a 24-step grayscale ramp.
#[derive(Debug, Clone)]
pub struct Palette256 {
    entries: [Rgba; 256],
}

impl Default for Palette256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette256 {
    #[must_use]
    pub fn new() -> Self {
        let mut entries = [Rgba::rgb(0, 0, 0); 256];
        entries[..16].copy_from_slice(&PALETTE_16);

        const STEPS: [u8; 6] = [0x00, 0x5F, 0x87, 0xAF, 0xD7, 0xFF];
        let mut idx = 16usize;
        for r in 0..6 {
            for g in 0..6 {
                for b in 0..6 {
                    entries[idx] = Rgba::rgb(STEPS[r], STEPS[g], STEPS[b]);
                    idx += 1;
                }
            }
        }

        for step in 0..24u32 {
            let level = (8 + step * 10) as u8;
            entries[idx] = Rgba::rgb(level, level, level);
            idx += 1;
        }

        Self { entries }
    }

    /// Entry at `index`, saturating rather than panicking (a 256-entry
    /// array indexed by `u8` can never miss, but this keeps the API total
    /// even if the representation ever changes).
    #[must_use]
    pub fn entry(&self, index: u8) -> Rgba {
        self.entries[index as usize]
    }

    /// Override a palette entry (used by OSC 4 "set color N").
    pub fn set_entry(&mut self, index: u8, color: Rgba) {
        self.entries[index as usize] = color;
    }
}
