//! Configured animation driven through the kernel, as the binary does.

use ndview::config::{AppConfig, PlaneSpeed};
use ndview::systems::AnimationSystem;
use ndview::{Kernel, Polytope, PolytopeKind};

fn run_frames(config: &AppConfig) -> (Vec<f32>, AnimationSystem) {
    let anim = &config.animation;
    let object = Polytope::generate(anim.object, anim.dimension, anim.size).unwrap();
    let mut kernel = Kernel::new(config.kernel_settings());
    let mut animation = AnimationSystem::new(&anim.planes);
    let mut positions = vec![0.0f32; object.vertex_count() * 3];

    for _ in 0..anim.frames {
        animation.update(anim.time_step);
        let frame = kernel
            .render_frame(anim.dimension, animation.angles(), object.vertices(), &mut positions, 0)
            .unwrap();
        assert_eq!(frame.vertex_count, object.vertex_count());
    }
    (positions, animation)
}

#[test]
fn default_config_runs() {
    let mut config = AppConfig::default();
    config.animation.frames = 30;
    let (positions, animation) = run_frames(&config);
    assert!(positions.iter().all(|p| p.is_finite()));
    assert!((animation.elapsed() - 0.5).abs() < 1e-9);
}

#[test]
fn every_plane_of_six_dimensions_animates() {
    let mut config = AppConfig::default();
    config.animation.dimension = 6;
    config.animation.object = PolytopeKind::Simplex;
    config.animation.frames = 10;
    config.animation.planes = ndview_core::RotationContext::new()
        .planes(6)
        .unwrap()
        .iter()
        .map(|p| PlaneSpeed {
            plane: p.name.clone(),
            speed: 0.2,
        })
        .collect();
    assert_eq!(config.animation.planes.len(), 15);

    let (positions, animation) = run_frames(&config);
    assert!(positions.iter().all(|p| p.is_finite()));
    assert_eq!(animation.angles().count(), 15);
}

#[test]
fn backends_agree_over_an_animation() {
    let mut config = AppConfig::default();
    config.animation.frames = 45;
    let (reference, _) = run_frames(&config);

    config.kernel.backend = ndview_core::BackendKind::Givens;
    let (givens, _) = run_frames(&config);

    for (a, b) in reference.iter().zip(&givens) {
        assert!((a - b).abs() < 1e-5);
    }
}

#[test]
fn zero_frames_leave_buffer_untouched() {
    let mut config = AppConfig::default();
    config.animation.frames = 0;
    let (positions, animation) = run_frames(&config);
    assert!(positions.iter().all(|&p| p == 0.0));
    assert_eq!(animation.elapsed(), 0.0);
}

#[test]
fn e8_roots_animate_from_config() {
    let config: AppConfig = toml::from_str(
        r#"
[animation]
dimension = 8
object = "roots_e8"
size = 1.0
frames = 5
time_step = 0.1

[[animation.planes]]
plane = "XA7"
speed = 0.4

[[animation.planes]]
plane = "A6A7"
speed = 0.9
"#,
    )
    .unwrap();
    config.validate().unwrap();
    assert_eq!(config.animation.object, PolytopeKind::RootsE8);

    let (positions, animation) = run_frames(&config);
    assert_eq!(positions.len(), 240 * 3);
    assert!(positions.iter().all(|p| p.is_finite()));
    assert_eq!(animation.angles().count(), 2);
}
