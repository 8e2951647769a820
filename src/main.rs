//! ndview - headless frame driver
//!
//! Loads the configuration, builds the configured polytope and runs the
//! animation for a fixed number of frames through the kernel, logging what
//! a renderer would receive.

use ndview::config::AppConfig;
use ndview::systems::AnimationSystem;
use ndview::{Kernel, Polytope};
use ndview_projection::positions_as_bytes;

fn main() {
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();

    if let Some(e) = load_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    if let Err(e) = run(&config) {
        log::error!("Frame loop failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &AppConfig) -> ndview::Result<()> {
    let anim = &config.animation;
    let dim = anim.dimension;
    let object = Polytope::generate(anim.object, dim, anim.size)?;
    log::info!(
        "Animating {}D {:?}: {} vertices, {} edges",
        dim,
        anim.object,
        object.vertex_count(),
        object.edge_count()
    );

    let mut kernel = Kernel::new(config.kernel_settings());
    let mut animation = AnimationSystem::new(&anim.planes);

    // Render buffers, allocated once for the whole run
    let mut positions = vec![0.0f32; object.vertex_count() * 3];
    let mut lines = vec![0.0f32; object.edge_count() * 6];

    let mut min_distance = f64::MAX;
    let mut max_distance = f64::MIN;
    let mut farthest = None;

    for frame_index in 0..anim.frames {
        animation.update(anim.time_step);

        let frame = kernel.render_frame(
            dim,
            animation.angles(),
            object.vertices(),
            &mut positions,
            0,
        )?;
        let distance = frame.projection_distance;
        min_distance = min_distance.min(distance);
        max_distance = max_distance.max(distance);
        farthest = frame.order.first().copied();

        kernel.project_edges(object.edges(), &mut lines, 0)?;
        log::debug!(
            "Frame {}: distance {:.3}, {} bytes of positions",
            frame_index,
            distance,
            positions_as_bytes(&positions).len()
        );
    }

    log::info!(
        "Rendered {} frames over {:.2}s ({} backend)",
        anim.frames,
        animation.elapsed(),
        kernel.rotation_context().backend_name()
    );
    if anim.frames > 0 {
        log::info!(
            "Projection distance range [{:.3}, {:.3}], last farthest vertex {:?}",
            min_distance,
            max_distance,
            farthest
        );
    }
    for (plane, angle) in animation.angles() {
        log::info!("Final {} angle: {:.4} rad", plane, angle);
    }
    Ok(())
}
