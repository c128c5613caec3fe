// ABOUTME: Workspace controller that turns panel events into placement passes.
// ABOUTME: Owns the panel hosts, container width, processing order, and committed layout snapshot.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use dash_core::{Config, LayoutConfig, Point, Size};
use dash_layout::{Corner, DragOverride, Layout, LayoutError, Packer, ProcessingOrder};

use crate::drag::DragMove;
use crate::panel::{PanelHost, PanelSpec, RenderRect};
use crate::throttle::PassThrottle;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("No panel at index {0}")]
    UnknownPanel(usize),

    #[error("Duplicate panel name: {0}")]
    DuplicatePanel(String),

    #[error("Panel {name} has span {span}; spans start at 1")]
    InvalidSpan { name: String, span: u32 },

    #[error("Placement pass failed: {0}")]
    Layout(#[from] LayoutError),
}

/// Discrete input to a workspace, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkspaceEvent {
    SizeObserved { index: usize, size: Size },
    ContainerResized { width: f32 },
    DragStart { index: usize },
    DragMove { index: usize, movement: DragMove },
    DragStop { index: usize },
}

pub struct Workspace {
    layout_config: LayoutConfig,
    reflow_during_drag: bool,
    packer: Packer,
    panels: Vec<PanelHost>,
    container_width: f32,
    snapshot: Arc<Layout>,
    order: ProcessingOrder,
    throttle: PassThrottle,
    passes: u64,
}

impl Workspace {
    pub fn new(specs: Vec<PanelSpec>, config: &Config) -> Result<Self, WorkspaceError> {
        validate_specs(&specs)?;
        let panels: Vec<PanelHost> = specs
            .into_iter()
            .map(|spec| PanelHost::new(spec, &config.layout))
            .collect();
        let count = panels.len();

        Ok(Self {
            layout_config: config.layout.clone(),
            reflow_during_drag: config.reflow.reflow_during_drag,
            packer: Packer::from_config(&config.layout),
            panels,
            container_width: 0.0,
            snapshot: Arc::new(Layout::unplaced(count)),
            order: ProcessingOrder::identity(count),
            throttle: PassThrottle::from_millis(config.reflow.coalesce_window_ms),
            passes: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn panels(&self) -> &[PanelHost] {
        &self.panels
    }

    pub fn panel(&self, index: usize) -> Option<&PanelHost> {
        self.panels.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.panels.iter().position(|p| p.name() == name)
    }

    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    /// Committed result of the last successful pass.
    pub fn layout(&self) -> &Arc<Layout> {
        &self.snapshot
    }

    pub fn order(&self) -> &ProcessingOrder {
        &self.order
    }

    /// Number of placement passes run so far.
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    /// Corners left at the end of the last pass, for diagnostic overlays.
    pub fn corners(&self) -> &[Corner] {
        self.snapshot.corners()
    }

    /// Where panel `index` should be drawn; `None` if it has no position yet.
    pub fn rendered(&self, index: usize) -> Option<RenderRect> {
        self.panels.get(index)?.rendered()
    }

    /// True while a coalesced pass is waiting for [`Workspace::tick`].
    pub fn has_pending_pass(&self) -> bool {
        self.throttle.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    /// Apply one event. Returns true if a placement pass ran.
    pub fn handle(&mut self, event: WorkspaceEvent, now: Instant) -> Result<bool, WorkspaceError> {
        match event {
            WorkspaceEvent::SizeObserved { index, size } => self.observe_size(index, size, now),
            WorkspaceEvent::ContainerResized { width } => self.resize_container(width, now),
            WorkspaceEvent::DragStart { index } => {
                self.drag_start(index)?;
                Ok(false)
            }
            WorkspaceEvent::DragMove { index, movement } => self.drag_move(index, movement, now),
            WorkspaceEvent::DragStop { index } => self.drag_stop(index, now),
        }
    }

    /// Run a deferred pass if its coalescing window has passed.
    pub fn tick(&mut self, now: Instant) -> Result<bool, WorkspaceError> {
        if !self.throttle.poll(now) {
            return Ok(false);
        }
        self.run_pass(self.active_drag())?;
        Ok(true)
    }

    pub fn observe_size(
        &mut self,
        index: usize,
        size: Size,
        now: Instant,
    ) -> Result<bool, WorkspaceError> {
        let panel = self
            .panels
            .get_mut(index)
            .ok_or(WorkspaceError::UnknownPanel(index))?;
        if !panel.observe_size(size) {
            return Ok(false);
        }
        tracing::trace!("Panel {} measured {}x{}", panel.name(), size.width, size.height);
        self.request_pass(now)
    }

    /// Non-finite and negative widths are recorded as 0.
    pub fn resize_container(&mut self, width: f32, now: Instant) -> Result<bool, WorkspaceError> {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        if width == self.container_width {
            return Ok(false);
        }
        tracing::debug!("Container width {} -> {}", self.container_width, width);
        self.container_width = width;
        self.request_pass(now)
    }

    pub fn drag_start(&mut self, index: usize) -> Result<Point, WorkspaceError> {
        let panel = self
            .panels
            .get_mut(index)
            .ok_or(WorkspaceError::UnknownPanel(index))?;
        let origin = panel.drag_start();
        tracing::debug!("Drag started on {} at ({}, {})", panel.name(), origin.x, origin.y);
        Ok(origin)
    }

    /// Move the dragged panel. Only reflows when `reflow_during_drag` is set.
    pub fn drag_move(
        &mut self,
        index: usize,
        movement: DragMove,
        now: Instant,
    ) -> Result<bool, WorkspaceError> {
        let panel = self
            .panels
            .get_mut(index)
            .ok_or(WorkspaceError::UnknownPanel(index))?;
        if panel.drag_move(movement).is_none() || !self.reflow_during_drag {
            return Ok(false);
        }
        self.request_pass(now)
    }

    /// Drop the dragged panel and reflow around its drop point.
    pub fn drag_stop(&mut self, index: usize, now: Instant) -> Result<bool, WorkspaceError> {
        let panel = self
            .panels
            .get_mut(index)
            .ok_or(WorkspaceError::UnknownPanel(index))?;
        let Some(provisional) = panel.drag_stop() else {
            return Ok(false);
        };
        tracing::debug!(
            "Drag stopped on {} at ({}, {})",
            panel.name(),
            provisional.left(),
            provisional.top()
        );

        self.throttle.record(now);
        self.run_pass(Some(DragOverride { index, provisional }))?;
        Ok(true)
    }

    /// Replace the panel list, carrying state over for panels whose name survives.
    pub fn replace_panels(
        &mut self,
        specs: Vec<PanelSpec>,
        now: Instant,
    ) -> Result<(), WorkspaceError> {
        validate_specs(&specs)?;

        let mut previous: HashMap<String, PanelHost> = self
            .panels
            .drain(..)
            .map(|panel| (panel.name().to_string(), panel))
            .collect();
        let mut kept = 0;
        self.panels = specs
            .into_iter()
            .map(|spec| match previous.remove(&spec.name) {
                Some(mut panel) => {
                    kept += 1;
                    panel.update_spec(spec, &self.layout_config);
                    panel
                }
                None => PanelHost::new(spec, &self.layout_config),
            })
            .collect();
        tracing::info!(
            "Panel list replaced: {} panels ({} kept, {} removed)",
            self.panels.len(),
            kept,
            previous.len()
        );

        self.order = ProcessingOrder::identity(self.panels.len());
        self.snapshot = Arc::new(Layout::unplaced(self.panels.len()));
        self.throttle.record(now);
        self.run_pass(self.active_drag())
    }

    fn request_pass(&mut self, now: Instant) -> Result<bool, WorkspaceError> {
        if !self.throttle.request(now) {
            tracing::trace!("Placement pass deferred");
            return Ok(false);
        }
        self.run_pass(self.active_drag())?;
        Ok(true)
    }

    fn active_drag(&self) -> Option<DragOverride> {
        self.panels.iter().enumerate().find_map(|(index, panel)| {
            panel
                .provisional()
                .map(|provisional| DragOverride { index, provisional })
        })
    }

    fn run_pass(&mut self, drag: Option<DragOverride>) -> Result<(), WorkspaceError> {
        let committed: Vec<_> = self.panels.iter().map(PanelHost::assigned).collect();
        self.order.update(&committed, drag);

        let sizes: Vec<Size> = self.panels.iter().map(PanelHost::size).collect();
        let layout = self
            .packer
            .pack(&sizes, self.order.as_slice(), self.container_width)?;

        for (panel, position) in self.panels.iter_mut().zip(layout.positions()) {
            panel.assign(*position);
        }
        self.snapshot = Arc::new(layout);
        self.passes += 1;
        Ok(())
    }
}

fn validate_specs(specs: &[PanelSpec]) -> Result<(), WorkspaceError> {
    let mut names = HashSet::new();
    for spec in specs {
        if spec.span == 0 {
            return Err(WorkspaceError::InvalidSpan {
                name: spec.name.clone(),
                span: spec.span,
            });
        }
        if !names.insert(spec.name.as_str()) {
            return Err(WorkspaceError::DuplicatePanel(spec.name.clone()));
        }
    }
    Ok(())
}
