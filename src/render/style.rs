//! Visual styling for rendered maps

/// RGB color
pub type Rgb = [u8; 3];

/// Format a color as `#rrggbb`
pub fn hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Fill and stroke of an outlined shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub fill: Rgb,
    pub fill_opacity: f64,
    pub stroke: Rgb,
    pub stroke_width: f64,
    pub stroke_opacity: f64,
}

/// Appearance of a station marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill: Rgb,
    pub stroke: Rgb,
    pub stroke_width: f64,
}

/// Trait for choosing how each map element looks
pub trait MapStyle {
    /// Style of the region outline drawn beneath the cells
    fn boundary(&self) -> PathStyle;

    /// Style of the cell owned by `seed_index`
    fn cell(&self, seed_index: usize) -> PathStyle;

    /// Style of the marker for `seed_index`
    fn marker(&self, seed_index: usize) -> MarkerStyle;
}

const BOUNDARY: PathStyle = PathStyle {
    fill: [0xf0, 0xf0, 0xf0],
    fill_opacity: 1.0,
    stroke: [0x99, 0x99, 0x99],
    stroke_width: 0.5,
    stroke_opacity: 1.0,
};

const CELL_BLUE: Rgb = [0x25, 0x63, 0xeb];

const MARKER: MarkerStyle = MarkerStyle {
    radius: 4.0,
    fill: [0xdc, 0x26, 0x26],
    stroke: [0xff, 0xff, 0xff],
    stroke_width: 1.5,
};

/// Light gray region, translucent blue cells, red station dots
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStyle;

impl MapStyle for DefaultStyle {
    fn boundary(&self) -> PathStyle {
        BOUNDARY
    }

    fn cell(&self, _seed_index: usize) -> PathStyle {
        PathStyle {
            fill: CELL_BLUE,
            fill_opacity: 0.1,
            stroke: CELL_BLUE,
            stroke_width: 1.5,
            stroke_opacity: 0.8,
        }
    }

    fn marker(&self, _seed_index: usize) -> MarkerStyle {
        MARKER
    }
}

/// Cycles cell colors through a palette so neighboring districts stand apart
#[derive(Debug, Clone)]
pub struct PaletteStyle {
    pub palette: Vec<Rgb>,
    pub fill_opacity: f64,
    pub boundary: PathStyle,
    pub marker: MarkerStyle,
}

impl Default for PaletteStyle {
    fn default() -> Self {
        Self {
            palette: vec![
                [0x25, 0x63, 0xeb],
                [0x16, 0xa3, 0x4a],
                [0xd9, 0x77, 0x06],
                [0x93, 0x33, 0xea],
                [0x08, 0x91, 0xb2],
                [0xdb, 0x27, 0x77],
            ],
            fill_opacity: 0.25,
            boundary: BOUNDARY,
            marker: MARKER,
        }
    }
}

impl MapStyle for PaletteStyle {
    fn boundary(&self) -> PathStyle {
        self.boundary
    }

    fn cell(&self, seed_index: usize) -> PathStyle {
        let color = if self.palette.is_empty() {
            CELL_BLUE
        } else {
            self.palette[seed_index % self.palette.len()]
        };
        PathStyle {
            fill: color,
            fill_opacity: self.fill_opacity,
            stroke: color,
            stroke_width: 1.5,
            stroke_opacity: 0.8,
        }
    }

    fn marker(&self, _seed_index: usize) -> MarkerStyle {
        self.marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex([0x25, 0x63, 0xeb]), "#2563eb");
        assert_eq!(hex([0, 0, 0]), "#000000");
    }

    #[test]
    fn test_default_style() {
        let style = DefaultStyle;
        assert_eq!(hex(style.boundary().fill), "#f0f0f0");
        assert_eq!(hex(style.boundary().stroke), "#999999");
        assert_eq!(style.cell(3).fill_opacity, 0.1);
        assert_eq!(style.cell(3).stroke_opacity, 0.8);
        assert_eq!(hex(style.marker(0).fill), "#dc2626");
        assert_eq!(style.marker(0).radius, 4.0);
    }

    #[test]
    fn test_palette_cycles() {
        let style = PaletteStyle {
            palette: vec![[1, 2, 3], [4, 5, 6]],
            ..Default::default()
        };
        assert_eq!(style.cell(0).fill, [1, 2, 3]);
        assert_eq!(style.cell(1).fill, [4, 5, 6]);
        assert_eq!(style.cell(2).fill, [1, 2, 3]);

        let empty = PaletteStyle {
            palette: Vec::new(),
            ..Default::default()
        };
        assert_eq!(empty.cell(5).fill, CELL_BLUE);
    }
}
