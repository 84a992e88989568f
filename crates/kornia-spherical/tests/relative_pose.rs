use glam::{DMat3, DVec2, DVec3};
use kornia_spherical::{
    camera::{planar_to_spherical, EquirectangularCamera},
    linalg::singular_values3,
    triangulation::{project_to_bearing, projection_from_pose},
    triangulate_dlt_euclidean, Kernel, SphericalEssentialKernel, SphericalError,
    TriangulationParams,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const WIDTH: usize = 5376;
const HEIGHT: usize = 2688;
const NUM_POINTS: usize = 120;
const NUM_OUTLIERS: usize = 30;
const ANGULAR_THRESHOLD: f64 = 1e-4;

struct Scene {
    rotation: DMat3,
    translation: DVec3,
    points: Vec<DVec3>,
    pixels1: Vec<DVec2>,
    pixels2: Vec<DVec2>,
    outliers: Vec<bool>,
}

// Two panoramas 1.5m apart looking at points scattered around a room.
fn synthetic_scene(seed: u64) -> Result<Scene, SphericalError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let camera = EquirectangularCamera::new(WIDTH, HEIGHT)?;
    let rotation = DMat3::from_euler(glam::EulerRot::YXZ, 0.6, 0.05, -0.03);
    let center2 = DVec3::new(1.2, 0.0, 0.9);
    let translation = -(rotation * center2);

    let p1 = projection_from_pose(&DMat3::IDENTITY, &DVec3::ZERO);
    let p2 = projection_from_pose(&rotation, &translation);

    let mut scene = Scene {
        rotation,
        translation,
        points: Vec::with_capacity(NUM_POINTS),
        pixels1: Vec::with_capacity(NUM_POINTS),
        pixels2: Vec::with_capacity(NUM_POINTS),
        outliers: vec![false; NUM_POINTS],
    };

    while scene.points.len() < NUM_POINTS {
        let point = DVec3::new(
            rng.random_range(-8.0..8.0),
            rng.random_range(-2.5..2.5),
            rng.random_range(-8.0..8.0),
        );
        if point.length() < 1.0 || (point - center2).length() < 1.0 {
            continue;
        }
        scene.points.push(point);
        scene
            .pixels1
            .push(camera.project(&project_to_bearing(&p1, &point)));
        scene
            .pixels2
            .push(camera.project(&project_to_bearing(&p2, &point)));
    }

    let outliers = rand::seq::index::sample(&mut rng, NUM_POINTS, NUM_OUTLIERS);
    for i in outliers.iter() {
        scene.pixels2[i] = DVec2::new(
            rng.random_range(0.0..WIDTH as f64),
            rng.random_range(0.0..HEIGHT as f64),
        );
        scene.outliers[i] = true;
    }

    Ok(scene)
}

// Minimal consensus loop standing in for an external robust estimator.
fn consensus<K: Kernel>(
    kernel: &K,
    threshold: f64,
    iterations: usize,
    rng: &mut StdRng,
) -> Option<(K::Model, Vec<usize>)> {
    let mut best: Option<(K::Model, Vec<usize>)> = None;
    for _ in 0..iterations {
        let sample = rand::seq::index::sample(rng, kernel.num_samples(), kernel.min_samples());
        let Ok(models) = kernel.fit(&sample.into_vec()) else {
            continue;
        };
        for model in models {
            let inliers: Vec<usize> = (0..kernel.num_samples())
                .filter(|&i| kernel.residual(&model, i) < threshold)
                .collect();
            let best_count = best.as_ref().map_or(0, |(_, b)| b.len());
            if inliers.len() > best_count {
                best = Some((model, inliers));
            }
        }
    }
    best
}

#[test]
fn spherical_relative_pose_with_outliers() -> Result<(), SphericalError> {
    let _ = env_logger::builder().is_test(true).try_init();

    let scene = synthetic_scene(42)?;
    let x1 = planar_to_spherical(&scene.pixels1, WIDTH, HEIGHT)?;
    let x2 = planar_to_spherical(&scene.pixels2, WIDTH, HEIGHT)?;
    let kernel = SphericalEssentialKernel::spherical(&x1, &x2)?;

    let mut rng = StdRng::seed_from_u64(7);
    let (_, inliers) =
        consensus(&kernel, ANGULAR_THRESHOLD, 400, &mut rng).expect("no model found");

    // every true inlier is accepted, almost no outlier is
    let true_inliers: Vec<usize> = (0..NUM_POINTS).filter(|&i| !scene.outliers[i]).collect();
    for i in &true_inliers {
        assert!(inliers.contains(i), "inlier {i} rejected");
    }
    assert!(inliers.len() <= true_inliers.len() + 2);

    // refit on the consensus set
    let e = kernel.fit(&inliers)?.remove(0);
    for &i in &true_inliers {
        assert!(kernel.residual(&e, i) < ANGULAR_THRESHOLD);
    }

    let s = singular_values3(&e);
    assert!((s.x - s.y).abs() < 1e-9 * s.x);
    assert!(s.z.abs() < 1e-9 * s.x);

    Ok(())
}

#[test]
fn triangulate_scene_with_known_pose() -> Result<(), SphericalError> {
    let scene = synthetic_scene(3)?;
    let x1 = planar_to_spherical(&scene.pixels1, WIDTH, HEIGHT)?;
    let x2 = planar_to_spherical(&scene.pixels2, WIDTH, HEIGHT)?;

    let p1 = projection_from_pose(&DMat3::IDENTITY, &DVec3::ZERO);
    let p2 = projection_from_pose(&scene.rotation, &scene.translation);
    let params = TriangulationParams::default();

    for i in (0..NUM_POINTS).filter(|&i| !scene.outliers[i]) {
        let point = triangulate_dlt_euclidean(&p1, &x1[i], &p2, &x2[i], &params)?;
        let err = (point - scene.points[i]).length();
        assert!(
            err < 1e-6 * scene.points[i].length(),
            "point {i}: error {err}"
        );
    }

    Ok(())
}

#[test]
fn minimal_sample_returns_single_model() -> Result<(), SphericalError> {
    let scene = synthetic_scene(11)?;
    let x1 = planar_to_spherical(&scene.pixels1, WIDTH, HEIGHT)?;
    let x2 = planar_to_spherical(&scene.pixels2, WIDTH, HEIGHT)?;
    let kernel = SphericalEssentialKernel::spherical(&x1, &x2)?;

    let sample: Vec<usize> = (0..NUM_POINTS)
        .filter(|&i| !scene.outliers[i])
        .take(8)
        .collect();
    let models = kernel.fit(&sample)?;
    assert_eq!(models.len(), 1);
    for &i in &sample {
        assert!(kernel.residual(&models[0], i) < 1e-6);
    }

    Ok(())
}
