//! Geometric regions used by the descriptor.
//!
//! The image is split into four corner quadrants with a centred ellipse cut
//! out of them, plus the ellipse itself. Masks are evaluated directly from
//! point-in-rectangle and point-in-ellipse predicates.

pub const REGION_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    Center,
}

impl Region {
    /// Fixed order in which region histograms are concatenated.
    pub const ORDER: [Region; REGION_COUNT] = [
        Region::TopLeft,
        Region::TopRight,
        Region::BottomRight,
        Region::BottomLeft,
        Region::Center,
    ];
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
}

impl Rect {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Filled axis-aligned ellipse. Empty when either semi-axis is zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ellipse {
    pub cx: usize,
    pub cy: usize,
    pub axis_x: usize,
    pub axis_y: usize,
}

impl Ellipse {
    /// `((x-cx)/ax)^2 + ((y-cy)/ay)^2 <= 1`, in exact integer arithmetic.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        if self.axis_x == 0 || self.axis_y == 0 {
            return false;
        }
        let dx = x as i64 - self.cx as i64;
        let dy = y as i64 - self.cy as i64;
        let ax2 = (self.axis_x as i64).pow(2);
        let ay2 = (self.axis_y as i64).pow(2);
        dx * dx * ay2 + dy * dy * ax2 <= ax2 * ay2
    }
}

/// Boolean pixel mask, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl RegionMask {
    fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    pub(crate) fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn area(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

/// Geometry shared by all five masks of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    pub width: usize,
    pub height: usize,
    pub corners: [Rect; 4],
    pub ellipse: Ellipse,
}

impl Layout {
    pub fn new(width: usize, height: usize) -> Self {
        let cx = width / 2;
        let cy = height / 2;
        let corners = [
            Rect { x0: 0, x1: cx, y0: 0, y1: cy },
            Rect { x0: cx, x1: width, y0: 0, y1: cy },
            Rect { x0: cx, x1: width, y0: cy, y1: height },
            Rect { x0: 0, x1: cx, y0: cy, y1: height },
        ];
        // floor(floor(n * 0.75) / 2)
        let ellipse = Ellipse {
            cx,
            cy,
            axis_x: (width * 3 / 4) / 2,
            axis_y: (height * 3 / 4) / 2,
        };
        Self {
            width,
            height,
            corners,
            ellipse,
        }
    }

    pub fn mask(&self, region: Region) -> RegionMask {
        let ellipse = self.ellipse;
        let corner = match region {
            Region::TopLeft => self.corners[0],
            Region::TopRight => self.corners[1],
            Region::BottomRight => self.corners[2],
            Region::BottomLeft => self.corners[3],
            Region::Center => {
                return RegionMask::from_fn(self.width, self.height, |x, y| ellipse.contains(x, y))
            }
        };
        RegionMask::from_fn(self.width, self.height, |x, y| {
            corner.contains(x, y) && !ellipse.contains(x, y)
        })
    }
}

/// The five region masks of a `width x height` image, in [`Region::ORDER`].
pub fn segment(width: usize, height: usize) -> [RegionMask; REGION_COUNT] {
    let layout = Layout::new(width, height);
    Region::ORDER.map(|r| layout.mask(r))
}
