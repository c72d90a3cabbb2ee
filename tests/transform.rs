use approx::{assert_relative_eq, relative_eq};
use nalgebra::{Point2, Point3, Vector3};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use stargazer_geometry::*;
use std::f64::consts::{FRAC_PI_2, PI};

type V3 = (f64, f64, f64);

const IDENTITY: [f64; POSE_DIM] = [0.0; POSE_DIM];
const UNIT_INTRINSICS: [f64; INTRINSICS_DIM] = [1.0, 0.0, 0.0, 1.0, 1.0, FRAC_PI_2];
const CAMERA_INTRINSICS: [f64; INTRINSICS_DIM] = [3.6, 320.0, 240.0, 170.0, 168.5, FRAC_PI_2];

fn pose(translation: V3, rotation: V3) -> [f64; POSE_DIM] {
    [
        translation.0,
        translation.1,
        translation.2,
        rotation.0,
        rotation.1,
        rotation.2,
    ]
}

#[test]
fn landmark_at_camera_center_is_degenerate() {
    // Landmark point (0, 0) of an identity landmark is the camera center.
    let world = landmark_to_world(0.0, 0.0, &IDENTITY);
    assert_eq!(world, Point3::origin());
    assert_eq!(
        world_to_image(&world, &IDENTITY, &UNIT_INTRINSICS),
        Err(ProjectionError::DegenerateProjection)
    );
    assert_eq!(
        landmark_to_image(0.0, 0.0, &IDENTITY, &IDENTITY, &UNIT_INTRINSICS),
        Err(ProjectionError::DegenerateProjection)
    );
}

#[test]
fn landmark_in_front_of_camera() {
    let landmark = [0.0, 0.0, 5.0, 0.0, 0.0, 0.0];
    let world = landmark_to_world(1.0, 2.0, &landmark);
    assert_relative_eq!(world, Point3::new(1.0, 2.0, 5.0));

    let image = landmark_to_image(1.0, 2.0, &landmark, &IDENTITY, &UNIT_INTRINSICS).unwrap();
    assert_relative_eq!(image, Point2::new(0.2, 0.4), epsilon = 1e-12);
}

#[test]
fn ceiling_landmark_seen_by_upward_camera() {
    // Camera 0.5 above the floor looking up, landmark on a 3 m ceiling, facing down.
    let camera = [1.0, 2.0, 0.5, 0.0, 0.0, 0.0];
    let landmark = [1.2, 1.9, 3.0, PI, 0.0, 0.0];

    // Flipping about x maps local (x, y) to (x, -y) on the ceiling.
    let world = landmark_to_world(0.1, 0.2, &landmark);
    assert_relative_eq!(world, Point3::new(1.3, 1.7, 3.0), epsilon = 1e-12);

    let image = landmark_to_image(0.1, 0.2, &landmark, &camera, &CAMERA_INTRINSICS).unwrap();
    let depth = 2.5;
    let expected = Point2::new(
        3.6 * 170.0 * 0.3 / depth + 320.0,
        3.6 * 168.5 * -0.3 / depth + 240.0,
    );
    assert_relative_eq!(image, expected, epsilon = 1e-9);
}

#[test]
fn transforms_are_reentrant() {
    let landmark = [0.3, -0.2, 3.0, 0.1, -0.05, 0.7];
    let camera = [0.0, 0.1, 0.0, 0.02, 0.03, -0.4];
    let corners: Vec<(f64, f64)> = (0..64)
        .map(|i| (0.01 * i as f64, -0.02 * i as f64))
        .collect();
    let sequential: Vec<_> = corners
        .iter()
        .map(|&(x, y)| landmark_to_image(x, y, &landmark, &camera, &CAMERA_INTRINSICS))
        .collect();

    let parallel: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = corners
            .chunks(8)
            .map(|chunk| {
                s.spawn(move || {
                    chunk
                        .iter()
                        .map(|&(x, y)| {
                            landmark_to_image(x, y, &landmark, &camera, &CAMERA_INTRINSICS)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });
    assert_eq!(sequential, parallel);
}

#[quickcheck]
fn identity_landmark_keeps_local_point(x: f64, y: f64) -> bool {
    landmark_to_world(x, y, &IDENTITY) == Point3::new(x, y, 0.0)
}

#[quickcheck]
fn landmark_to_image_is_a_composition(
    corner: (f64, f64),
    lm_t: V3,
    lm_r: V3,
    cam_t: V3,
    cam_r: V3,
) -> bool {
    let landmark = pose(lm_t, lm_r);
    let camera = pose(cam_t, cam_r);
    let composed = landmark_to_image(corner.0, corner.1, &landmark, &camera, &CAMERA_INTRINSICS);
    let world = landmark_to_world(corner.0, corner.1, &landmark);
    composed == world_to_image(&world, &camera, &CAMERA_INTRINSICS)
}

#[quickcheck]
fn projection_is_scale_invariant(p: V3, k: f64, cam_r: V3) -> TestResult {
    let camera = pose((0.0, 0.0, 0.0), cam_r);
    let world = Point3::new(p.0, p.1, p.2);
    if world_to_camera(&world, &camera).z.abs() < 1e-3 * (1.0 + world.coords.norm()) {
        return TestResult::discard();
    }
    // Scale factors spread over 30 orders of magnitude around 1.
    let k = 10f64.powf(k % 15.0);
    let scaled = Point3::from(world.coords * k);

    let image = world_to_image(&world, &camera, &CAMERA_INTRINSICS).unwrap();
    let image_scaled = world_to_image(&scaled, &camera, &CAMERA_INTRINSICS).unwrap();
    TestResult::from_bool(relative_eq!(
        image,
        image_scaled,
        epsilon = 1e-9,
        max_relative = 1e-9
    ))
}

#[test]
fn tiny_landmark_projects_like_a_large_one() {
    let world = Point3::new(1.0, 2.0, 5.0);
    let image = world_to_image(&world, &IDENTITY, &UNIT_INTRINSICS).unwrap();
    let tiny = Point3::new(1e-13, 2e-13, 5e-13);
    let image_tiny = world_to_image(&tiny, &IDENTITY, &UNIT_INTRINSICS).unwrap();
    assert_relative_eq!(image_tiny, image, epsilon = 1e-12);
}

#[quickcheck]
fn full_turn_leaves_landmark_unchanged(corner: (f64, f64), lm_t: V3, lm_r: V3) -> TestResult {
    let rotation = Vector3::new(lm_r.0, lm_r.1, lm_r.2);
    let angle = rotation.norm();
    if angle < 1e-3 {
        return TestResult::discard();
    }
    let turned = rotation * (1.0 + 2.0 * PI / angle);

    let landmark = pose(lm_t, lm_r);
    let landmark_turned = pose(lm_t, (turned.x, turned.y, turned.z));
    let world = landmark_to_world(corner.0, corner.1, &landmark);
    let world_turned = landmark_to_world(corner.0, corner.1, &landmark_turned);
    TestResult::from_bool(relative_eq!(
        world,
        world_turned,
        epsilon = 1e-9 * (1.0 + world.coords.norm())
    ))
}

#[quickcheck]
fn camera_position_is_degenerate(cam_t: V3, cam_r: V3) -> bool {
    let camera = pose(cam_t, cam_r);
    let world = Point3::new(cam_t.0, cam_t.1, cam_t.2);
    world_to_image(&world, &camera, &CAMERA_INTRINSICS) == Err(ProjectionError::DegenerateProjection)
}

#[quickcheck]
fn residual_vanishes_on_predicted_pixel(corner: (f64, f64), lm_r: V3) -> TestResult {
    let landmark = pose((0.0, 0.0, 3.0), (lm_r.0 * 1e-2, lm_r.1 * 1e-2, lm_r.2 * 1e-2));
    let camera = IDENTITY;
    let corner = [corner.0 * 1e-2, corner.1 * 1e-2];
    let predicted =
        match landmark_to_image(corner[0], corner[1], &landmark, &camera, &CAMERA_INTRINSICS) {
            Ok(p) => p,
            Err(_) => return TestResult::discard(),
        };
    let observation = Observation::new(corner, [predicted.x, predicted.y]);
    let residual =
        reprojection_residual(&observation, &landmark, &camera, &CAMERA_INTRINSICS).unwrap();
    TestResult::from_bool(residual.norm() < 1e-9)
}
