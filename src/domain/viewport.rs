pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 4.0;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Pan/zoom transform between canvas (world) coordinates and screen
/// coordinates. `offset` is the world point shown at the screen origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Viewport {
    pub fn world_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.offset_x) * self.zoom, (y - self.offset_y) * self.zoom)
    }

    pub fn screen_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        (x / self.zoom + self.offset_x, y / self.zoom + self.offset_y)
    }

    /// Pan by a distance given in screen units
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx / self.zoom;
        self.offset_y += dy / self.zoom;
    }

    /// Multiply zoom by `factor`, keeping the screen point `(ax, ay)` fixed
    pub fn zoom_at(&mut self, factor: f64, ax: f64, ay: f64) {
        let (wx, wy) = self.screen_to_world(ax, ay);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset_x = wx - ax / self.zoom;
        self.offset_y = wy - ay / self.zoom;
    }

    /// Zoom around the center of a `width` x `height` screen
    pub fn zoom_by(&mut self, factor: f64, width: f64, height: f64) {
        self.zoom_at(factor, width / 2.0, height / 2.0);
    }

    /// Place world point `(x, y)` at the center of the screen
    pub fn center_on(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.offset_x = x - width / (2.0 * self.zoom);
        self.offset_y = y - height / (2.0 * self.zoom);
    }

    /// World-space rectangle visible on a `width` x `height` screen,
    /// as `([x_min, x_max], [y_min, y_max])`
    pub fn visible_bounds(&self, width: f64, height: f64) -> ([f64; 2], [f64; 2]) {
        let (x1, y1) = self.screen_to_world(width, height);
        ([self.offset_x, x1], [self.offset_y, y1])
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
