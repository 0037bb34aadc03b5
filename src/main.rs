use std::path::PathBuf;
use std::process::ExitCode;

use math::Vec2;
use scene::OrbitCamera;

mod draw;
mod error;
mod input;
mod model;
mod options;

use draw::{DrawList, DrawTarget};
use error::ViewerError;
use input::{PointerEvent, PointerTracker};
use model::Model;
use options::{ModelOptions, ViewerOptions};

/// Builds this frame's view from the camera and lets every model draw.
fn frame(models: &[Box<dyn Model>], camera: &OrbitCamera, list: &mut DrawList) {
    list.clear();
    let view = camera.view();
    for model in models {
        model.render(list, &view);
    }

    log::info!("eye {:.2} center {:.2}: {} draws, {} vertices",
               camera.eye(), camera.center(), list.calls().len(), list.vertex_count());
    for call in list.calls() {
        log::debug!("{} ({} vertices, indexed {}, textured {}) {:.3}",
                    call.primitive, call.vertex_count, call.indexed, call.textured,
                    call.model_view);
    }
}

/// Short orbit and zoom, standing in for live pointer input.
fn scripted_gestures() -> Vec<PointerEvent> {
    let mut events = vec![PointerEvent::Pressed { position: Vec2::ZERO, modifier: true }];
    for step in 1..=4 {
        events.push(PointerEvent::Moved {
            position: Vec2::new(step as f32 * 15., step as f32 * 2.),
            modifier: true,
        });
    }
    events.push(PointerEvent::Released);
    events.push(PointerEvent::Wheel { delta: -100. });
    events
}

fn run() -> Result<(), ViewerError> {
    let mut options = ViewerOptions::default();
    let mut assets: Vec<PathBuf> = Vec::new();
    for arg in std::env::args().skip(1) {
        let path = PathBuf::from(arg);
        if path.extension().is_some_and(|ext| ext == "toml") {
            options = ViewerOptions::load(&path)?;
        } else {
            assets.push(path);
        }
    }
    options.models.extend(assets.into_iter()
        .map(|path| ModelOptions::Terrain { path, scale: 1. }));

    if options.models.is_empty() {
        return Err(ViewerError::Usage("viewer [options.toml] [asset.glb ...]".to_string()));
    }

    let mut camera = options.camera();
    let parser = options.parser();
    let mut models = options.build_models();

    for model in models.iter_mut() {
        // a failed model stays empty and is simply not drawn
        if let Err(e) = pollster::block_on(model::load_model(model.as_mut(), &parser)) {
            log::error!("{}: {e}", model.path().display());
        }
    }
    let loaded = models.iter().filter(|m| m.data().is_some()).count();
    log::info!("{loaded} of {} models loaded", models.len());

    let mut list = DrawList::new();
    list.set_projection(&camera.projection().matrix());
    log::debug!("projection {:.3}", list.projection());

    frame(&models, &camera, &mut list);

    let mut tracker = PointerTracker::new(options.camera.zoom_per_wheel_unit);
    for event in scripted_gestures() {
        tracker.handle(event, &mut camera);
        log::debug!("{event:?} -> {:?}", tracker.gesture());
        if matches!(event, PointerEvent::Moved { .. } | PointerEvent::Wheel { .. }) {
            frame(&models, &camera, &mut list);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
