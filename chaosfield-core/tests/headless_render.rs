use chaosfield_core::{
    classify, iterate, zoom_frames, Attractor, Complex, ComplexGrid, Polynomial, Viewport,
    ZoomMode,
};

fn quintic() -> Polynomial {
    Polynomial::new(vec![1.0, 0.0, 0.0, 1.0, -1.0, 1.0]).unwrap()
}

#[test]
fn headless_newton_classification() {
    let p = quintic();
    let viewport = Viewport::square((-1.5, 1.5)).unwrap();
    let grid = ComplexGrid::square(16, &viewport).unwrap();

    let out = iterate(&p, &grid.points, 10).unwrap();
    let classes = classify(p.roots(), &out.values);

    assert_eq!(classes.len(), 256);
    assert!(classes.iter().all(|&c| c <= 4));
    assert!(out.counts.iter().all(|&c| c <= 10));

    // A 16×16 grid over the whole basin picture reaches more than one root.
    let distinct: std::collections::BTreeSet<_> = classes.iter().collect();
    assert!(distinct.len() > 1, "expected several basins, got {distinct:?}");
    assert!(out.counts.iter().any(|&c| c > 0), "some points should converge");
}

#[test]
fn headless_render_is_deterministic() {
    let p = quintic();
    let viewport = Viewport::new((-1.2, 0.8), (-0.6, 1.1)).unwrap();
    let grid = ComplexGrid::even(24, &viewport).unwrap();

    let run1 = iterate(&p, &grid.points, 15).unwrap();
    let run2 = iterate(&p, &grid.points, 15).unwrap();

    assert_eq!(run1, run2, "two identical runs must produce identical results");
}

#[test]
fn seeds_at_roots_stay_put() {
    let p = quintic();
    let roots: Vec<Complex> = p.roots().to_vec();
    let out = iterate(&p, &roots, 20).unwrap();
    let classes = classify(p.roots(), &out.values);
    assert_eq!(classes, (0..5).collect::<Vec<_>>());
    assert!(out.counts.iter().all(|&c| c == 20));
}

#[test]
fn zoom_sequence_feeds_newton() {
    let p = quintic();
    let start = Viewport::square((-1.5, 1.5)).unwrap();
    let end = Viewport::new((-1.009290, -1.009265), (0.147300, 0.147325)).unwrap();
    let frames = zoom_frames(&start, &end, 6, ZoomMode::Geometric).unwrap();

    for frame in &frames {
        let grid = ComplexGrid::square(8, &frame.flipped_y()).unwrap();
        let out = iterate(&p, &grid.points, 10).unwrap();
        assert_eq!(out.values.len(), 64);
    }
}

#[test]
fn headless_attractor_run() {
    let att = Attractor::fractal_dream_preset();
    let (x0, y0) = Attractor::DEFAULT_SEED;
    let traj = att.trajectory(x0, y0, 200_000).unwrap();

    assert_eq!(traj.len(), 200_000);
    assert!(traj.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
    let again = att.trajectory(x0, y0, 200_000).unwrap();
    assert_eq!(traj, again);
}
