// ABOUTME: Host for a single dashboard panel.
// ABOUTME: Tracks observed content size, assigned position, and live drag position for rendering.

use dash_core::{LayoutConfig, Point, Position, Size};
use serde::{Deserialize, Serialize};

use crate::drag::{DragMove, DragTracker};

/// Panel description supplied by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    /// Unique, stable key within a workspace
    pub name: String,

    /// Column span, mapped to a pixel width by the layout config
    pub span: u32,

    #[serde(default)]
    pub content: String,
}

impl PanelSpec {
    pub fn new(name: impl Into<String>, span: u32) -> Self {
        Self {
            name: name.into(),
            span,
            content: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// Where to draw a panel. Height comes from the content itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderRect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
}

#[derive(Debug, Clone)]
pub struct PanelHost {
    spec: PanelSpec,
    width: f32,
    size: Size,
    assigned: Option<Position>,
    drag: Option<DragTracker>,
}

impl PanelHost {
    pub fn new(spec: PanelSpec, layout: &LayoutConfig) -> Self {
        let width = layout.pixel_width(spec.span);
        Self {
            spec,
            width,
            size: Size::UNMEASURED,
            assigned: None,
            drag: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Requested pixel width for this panel's span.
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn assigned(&self) -> Option<Position> {
        self.assigned
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Swap in an updated spec for the same panel, keeping size and position.
    pub fn update_spec(&mut self, spec: PanelSpec, layout: &LayoutConfig) {
        self.width = layout.pixel_width(spec.span);
        self.spec = spec;
    }

    /// Record a content-box measurement. Returns false if it repeats the last one.
    pub fn observe_size(&mut self, size: Size) -> bool {
        if size == self.size {
            return false;
        }
        self.size = size;
        true
    }

    pub fn assign(&mut self, position: Option<Position>) {
        self.assigned = position;
    }

    /// Begin a drag from the panel's assigned position.
    pub fn drag_start(&mut self) -> Point {
        let origin = self
            .assigned
            .map(|p| p.top_left())
            .unwrap_or(Point::ORIGIN);
        self.drag = Some(DragTracker::start(origin));
        origin
    }

    /// Returns the new live position, or `None` if no drag is active.
    pub fn drag_move(&mut self, movement: DragMove) -> Option<Point> {
        self.drag.as_mut().map(|drag| drag.apply(movement))
    }

    /// Live rectangle of the panel being dragged.
    pub fn provisional(&self) -> Option<Position> {
        let drag = self.drag.as_ref()?;
        Some(Position::at(drag.current(), self.footprint()))
    }

    /// End the drag and return the rectangle where it was dropped.
    pub fn drag_stop(&mut self) -> Option<Position> {
        let provisional = self.provisional();
        self.drag = None;
        provisional
    }

    pub fn rendered(&self) -> Option<RenderRect> {
        let top_left = match &self.drag {
            Some(drag) => drag.current(),
            None => self.assigned?.top_left(),
        };
        Some(RenderRect {
            top: top_left.y,
            left: top_left.x,
            width: self.width,
        })
    }

    fn footprint(&self) -> Size {
        if self.size.is_measured() {
            self.size
        } else {
            Size::new(self.width, 0.0)
        }
    }
}
