// ABOUTME: Command-line entry point for dashpack.
// ABOUTME: Loads a scene, feeds measurements and drags through a workspace, and prints the layout.

mod scene;

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dash_core::{Config, Point, Size};
use dash_host::{DragMove, ResizeRegistry, ResizeWatcher, Workspace, WorkspaceEvent};
use dash_layout::Corner;
use scene::Scene;

#[derive(Debug, Parser)]
#[command(name = "dashpack", about = "Pack dashboard panels into a container")]
struct Cli {
    /// Scene file (TOML) with the container width and panels
    scene: PathBuf,

    /// Config file (defaults to ~/.config/dashpack/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the container width from the scene
    #[arg(long)]
    width: Option<f32>,

    /// Name of a panel to drag after the initial layout
    #[arg(long, requires = "to")]
    drag: Option<String>,

    /// Drop point for --drag, as X,Y
    #[arg(long, value_parser = parse_point, requires = "drag")]
    to: Option<Point>,

    /// Print the layout as JSON
    #[arg(long)]
    json: bool,

    /// Include the remaining frontier corners in the output
    #[arg(long)]
    corners: bool,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok(Point::new(x, y))
}

/// Region handles observed by the harness.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Region {
    Container,
    Panel(usize),
}

/// Stands in for the platform resize observer.
struct LoggingWatcher;

impl ResizeWatcher<Region> for LoggingWatcher {
    fn watch(&mut self, region: &Region) {
        tracing::debug!("Watching {:?}", region);
    }

    fn unwatch(&mut self, region: &Region) {
        tracing::debug!("Stopped watching {:?}", region);
    }
}

#[derive(Serialize)]
struct PanelReport<'a> {
    name: &'a str,
    placed: bool,
    top: f32,
    left: f32,
    width: f32,
    height: f32,
}

#[derive(Serialize)]
struct Report<'a> {
    container_width: f32,
    content_height: f32,
    passes: u64,
    panels: Vec<PanelReport<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    corners: Option<&'a [Corner]>,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Config::load_or_default()),
    }
}

fn drain(rx: &Receiver<WorkspaceEvent>, workspace: &mut Workspace, now: Instant) -> Result<()> {
    for event in rx.try_iter() {
        workspace.handle(event, now)?;
    }
    Ok(())
}

/// Run any coalesced pass that is still waiting.
fn settle(workspace: &mut Workspace) -> Result<()> {
    if let Some(deadline) = workspace.next_deadline() {
        workspace.tick(deadline.max(Instant::now()))?;
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;
    tracing::info!(
        "Loaded config: gap={}, coalesce_window_ms={}",
        config.layout.gap,
        config.reflow.coalesce_window_ms
    );

    let scene = Scene::load(&cli.scene)?;
    let container_width = cli.width.unwrap_or(scene.container_width);
    let mut workspace = Workspace::new(scene.specs(), &config)?;

    let (tx, rx) = mpsc::channel();
    let mut registry = ResizeRegistry::new(LoggingWatcher);
    let container_tx = tx.clone();
    registry.subscribe(Region::Container, move |size: Size| {
        let _ = container_tx.send(WorkspaceEvent::ContainerResized { width: size.width });
    });
    for index in 0..workspace.len() {
        let tx = tx.clone();
        registry.subscribe(Region::Panel(index), move |size| {
            let _ = tx.send(WorkspaceEvent::SizeObserved { index, size });
        });
    }

    let now = Instant::now();
    registry.deliver(&Region::Container, Size::new(container_width, 0.0));
    for (index, panel) in scene.panels.iter().enumerate() {
        if let Some(height) = panel.height {
            let width = workspace.panels()[index].width();
            registry.deliver(&Region::Panel(index), Size::new(width, height));
        }
    }
    drain(&rx, &mut workspace, now)?;
    settle(&mut workspace)?;

    if let (Some(name), Some(to)) = (&cli.drag, cli.to) {
        let Some(index) = workspace.index_of(name) else {
            bail!("No panel named '{name}'");
        };
        let now = Instant::now();
        workspace.handle(WorkspaceEvent::DragStart { index }, now)?;
        workspace.handle(
            WorkspaceEvent::DragMove {
                index,
                movement: DragMove::Absolute { x: to.x, y: to.y },
            },
            now,
        )?;
        workspace.handle(WorkspaceEvent::DragStop { index }, now)?;
        settle(&mut workspace)?;
    }

    print_report(cli, &workspace)
}

fn print_report(cli: &Cli, workspace: &Workspace) -> Result<()> {
    let layout = workspace.layout();
    let panels = workspace
        .panels()
        .iter()
        .enumerate()
        .map(|(index, panel)| {
            let position = layout.position(index);
            PanelReport {
                name: panel.name(),
                placed: position.is_some(),
                top: position.map_or(0.0, |p| p.top()),
                left: position.map_or(0.0, |p| p.left()),
                width: panel.width(),
                height: panel.size().height,
            }
        })
        .collect();
    let report = Report {
        container_width: workspace.container_width(),
        content_height: layout.content_height(),
        passes: workspace.pass_count(),
        panels,
        corners: cli.corners.then(|| workspace.corners()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "container {}px, content height {}px, {} passes",
        report.container_width, report.content_height, report.passes
    );
    for panel in &report.panels {
        if panel.placed {
            println!(
                "{:<24} left {:>6} top {:>6} size {}x{}",
                panel.name, panel.left, panel.top, panel.width, panel.height
            );
        } else {
            println!("{:<24} (not placed)", panel.name);
        }
    }
    if let Some(corners) = report.corners {
        for (i, corner) in corners.iter().enumerate() {
            println!("corner {:>3} at ({}, {})", i, corner.x, corner.y);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting dashpack");

    let cli = Cli::parse();
    run(&cli)
}
