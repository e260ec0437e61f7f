use anyhow::{Context, Result};
use clap::Parser;
use gazekit_core::glam::Vec3;
use gazekit_core::{
    AdapterView, Button, DwellConfig, Eye, ListAdapter, ListConfig, ListView, RenderContext, Scene,
    Widget, WidgetExt,
};
use gazekit_devtools::{SceneSnapshot, devtools};
use gazekit_driver::{CameraConfig, EyeView, HeadPose, ManualClock, StereoDriver};
use gazekit_renderer::{HeadlessRenderer, SolidRasterizer};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gaze-list")]
#[command(about = "Drives a gaze-controlled list through a scripted head sweep", long_about = None)]
struct Cli {
    /// JSON file with `list`, `dwell` and `camera` sections
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of list rows
    #[arg(long, default_value_t = 12)]
    items: usize,
    /// Frames to simulate
    #[arg(long, default_value_t = 360)]
    frames: u32,
    /// Milliseconds between frames
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Select by dwelling instead of the physical trigger
    #[arg(long)]
    focus_mode: bool,
    /// Optional OBJ model placed beside the list
    #[arg(long)]
    model: Option<PathBuf>,
    /// Where to write the final scene snapshot (stdout when omitted)
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct DemoConfig {
    list: ListConfig,
    dwell: DwellConfig,
    camera: CameraConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<DemoConfig> {
    let Some(path) = path else {
        return Ok(DemoConfig::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("parsing config {}", path.display()))
}

/// Gaze target for each phase of the sweep, as (x, y, plane z).
fn sweep_target(frame: u32, frames: u32) -> (f32, f32, f32) {
    let phase = frame * 4 / frames.max(1);
    match phase {
        // down affordance
        0 => (1.0, 0.5, 0.1),
        // second visible row
        1 => (1.0, 2.5, 0.0),
        // dismiss button
        2 => (3.5, 0.5, 0.0),
        _ => (-10.0, -10.0, 0.0),
    }
}

fn build_scene(cli: &Cli, config: &DemoConfig) -> Result<Scene> {
    let scene = Scene::with_title("Gaze list");
    let handle = scene.handle();

    let items: Vec<String> = (0..cli.items).map(|i| format!("Item {i}")).collect();
    let adapter = ListAdapter::new(|item: &String, position| {
        let mut button = Button::text(item.clone());
        let label = item.clone();
        button.base_mut().set_on_trigger_listener(move |_| {
            tracing::info!(position, item = %label, "item selected");
        });
        button.boxed()
    })
    .with_items(items);

    let mut list = ListView::new(config.list.clone());
    list.set_adapter(Box::new(adapter));
    scene.add_view(list);

    let mut dismiss = Button::text("dismiss");
    dismiss.translate(3.0, 0.0, 0.0);
    dismiss.base_mut().set_on_trigger_listener(move |base| {
        tracing::info!(id = %base.id(), "dismissing");
        handle.remove_view(base.id());
    });
    scene.add_view(dismiss);

    if let Some(path) = &cli.model {
        let mut mesh = gazekit_obj::load(path)
            .and_then(|model| model.to_geometry())
            .map(gazekit_core::MeshWidget::new)
            .with_context(|| format!("loading model {}", path.display()))?;
        mesh.translate(-3.0, 1.0, 0.0);
        scene.add_view(mesh);
    }

    Ok(scene)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let clock = ManualClock::new();
    let mut driver =
        StereoDriver::new(clock.clone(), config.camera).with_dwell(config.dwell);
    let scene_id = driver.add_scene(build_scene(&cli, &config)?);
    driver.set_current_scene(scene_id)?;
    driver.set_focus_mode(cli.focus_mode);

    let eyes = [
        EyeView::perspective(Eye::Left, 0.032, 1.4, 1.0, &config.camera),
        EyeView::perspective(Eye::Right, -0.032, 1.4, 1.0, &config.camera),
    ];
    let mut renderer = HeadlessRenderer::new();
    let rasterizer = SolidRasterizer::new();
    let frame_step = Duration::from_millis(cli.frame_ms);
    let mut last_phase = None;

    for frame in 0..cli.frames {
        clock.advance(frame_step);
        let (x, y, plane_z) = sweep_target(frame, cli.frames);
        let depth = config.camera.eye.z - plane_z;
        let head = HeadPose::looking(Vec3::new(x, y, depth));

        // One click shortly after settling on each target.
        let phase = frame * 4 / cli.frames.max(1);
        if !cli.focus_mode && last_phase == Some(phase) && frame % 60 == 30 {
            driver.trigger();
        }
        last_phase = Some(phase);

        let uploads_before = renderer.upload_count();
        {
            let mut rcx = RenderContext::new(&mut renderer, &rasterizer);
            driver.run_frame(head, &eyes, &mut rcx);
        }
        let draws = renderer.take_draws().len();
        devtools().update_metrics(draws, renderer.upload_count() - uploads_before);
        if let Some(scene) = driver.current_scene() {
            devtools().record_frame(scene);
        }
    }

    tracing::info!(
        frames = driver.frame_count(),
        textures = renderer.live_textures(),
        recorded = devtools().frames(),
        "sweep finished"
    );

    let scene = driver
        .current_scene()
        .context("current scene disappeared during the sweep")?;
    let json = SceneSnapshot::capture(scene).to_json()?;
    match &cli.snapshot {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}
