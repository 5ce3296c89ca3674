//! Headless end-to-end runs of the frame driver: the same sequence the windowed loop
//! performs, minus the GPU.

use magnus::config::SceneConfig;
use magnus::driver::{FrameDriver, InputEvent, RunState};
use magnus::text::Text3D;
use rand::{SeedableRng, rngs::StdRng};

fn driver(seed: u64) -> FrameDriver {
    FrameDriver::new(SceneConfig::default(), &mut StdRng::seed_from_u64(seed)).unwrap()
}

/// Poll input, build, "present", bump the counter. Returns how many frames were drawn.
fn run(driver: &mut FrameDriver, frames: usize, quit_at: Option<usize>) -> usize {
    let mut drawn = 0;
    for i in 0..frames {
        if quit_at == Some(i) {
            driver.handle_input(InputEvent::KeyPressed);
        }
        if !driver.is_running() {
            break;
        }
        let frame = driver.build_frame().expect("running driver builds frames");
        assert!(!frame.draw_list.is_empty());
        drawn += 1;
        driver.end_frame();
    }
    drawn
}

#[test]
fn long_run_keeps_every_invariant() {
    let mut d = driver(11);
    assert_eq!(run(&mut d, 1_000, None), 1_000);
    assert_eq!(d.rotation(), 1_000);

    for p in d.particles() {
        assert_eq!(p.trail().len(), p.max_trail_len());
        let o = p.orbit();
        let pos = p.position();
        let r = (pos.x * pos.x + pos.z * pos.z).sqrt();
        assert!((r - o.radius).abs() < 1e-3);
        assert!((pos.y - o.base_y).abs() <= 0.5 + 1e-5);
        assert_eq!(*p.trail().back().unwrap(), pos);
    }
}

#[test]
fn quit_in_first_frame_draws_nothing() {
    let mut d = driver(5);
    assert_eq!(run(&mut d, 10, Some(0)), 0);
    assert_eq!(d.state(), RunState::Stopped);
    assert_eq!(d.rotation(), 0);
    assert!(d.particles().iter().all(|p| p.trail().is_empty()));
}

#[test]
fn quit_mid_run_stops_without_another_frame() {
    let mut d = driver(6);
    assert_eq!(run(&mut d, 100, Some(42)), 42);
    assert_eq!(d.rotation(), 42);
    assert!(d.build_frame().is_none());
}

#[test]
fn frame_geometry_grows_with_trails_then_plateaus() {
    let mut d = driver(9);
    let mut text = magnus::scene::DrawList::new();
    Text3D::new("MAGNUS", 1.0, 0.2).draw(&mut text);
    let text_segments = text.segment_count();

    let mut last = 0;
    for _ in 0..40 {
        let frame = d.build_frame().unwrap();
        d.end_frame();
        last = frame.draw_list.segment_count();
    }
    // After 40 frames every trail (max 30) is full: len - 1 segments each.
    let trail_segments: usize = d.particles().iter().map(|p| p.max_trail_len() - 1).sum();
    assert_eq!(last, text_segments + trail_segments);
}

#[test]
fn same_seed_gives_same_scene() {
    let mut a = driver(123);
    let mut b = driver(123);
    run(&mut a, 10, None);
    run(&mut b, 10, None);
    for (pa, pb) in a.particles().iter().zip(b.particles()) {
        assert_eq!(pa.position(), pb.position());
        assert_eq!(pa.colors(), pb.colors());
    }
}
