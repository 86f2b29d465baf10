// Ray/plane intersection and viewport clamping.

use aim_core::{clamp_to_viewport, ConfigError, Ray, ReferencePlane, Viewport};
use glam::{Vec2, Vec3};
use rand::prelude::*;

mod common;
use common::{approx_vec3, EPS};

#[test]
fn straight_down_ray_hits_ground_at_origin() {
    let plane = ReferencePlane::ground();
    let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
    let hit = plane.intersect(&ray).expect("ray points at the plane");
    assert!(approx_vec3(hit, Vec3::ZERO), "hit {hit:?}");
}

#[test]
fn oblique_ray_matches_analytic_solution() {
    // From (0, 4, 0) towards (3, -4, 0): reaches y=0 at x=3
    let plane = ReferencePlane::ground();
    let ray = Ray::new(Vec3::new(0.0, 4.0, 0.0), Vec3::new(3.0, -4.0, 0.0));
    let hit = plane.intersect(&ray).unwrap();
    assert!(approx_vec3(hit, Vec3::new(3.0, 0.0, 0.0)), "hit {hit:?}");
}

#[test]
fn parallel_ray_has_no_intersection() {
    let plane = ReferencePlane::ground();
    let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
    assert!(plane.intersect(&ray).is_none());
}

#[test]
fn plane_behind_ray_has_no_intersection() {
    let plane = ReferencePlane::ground();
    let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
    assert!(plane.intersect(&ray).is_none());
}

#[test]
fn ray_starting_on_plane_hits_its_origin() {
    let plane = ReferencePlane::ground();
    let origin = Vec3::new(2.0, 0.0, -1.0);
    let ray = Ray::new(origin, Vec3::new(0.0, -1.0, 1.0));
    assert!(approx_vec3(plane.intersect(&ray).unwrap(), origin));
}

#[test]
fn offset_plane_is_shifted_along_normal() {
    let plane = ReferencePlane::new(Vec3::Y, 2.5).unwrap();
    let ray = Ray::new(Vec3::new(1.0, 10.0, 1.0), Vec3::NEG_Y);
    let hit = plane.intersect(&ray).unwrap();
    assert!(approx_vec3(hit, Vec3::new(1.0, 2.5, 1.0)));
}

#[test]
fn through_point_matches_normal_and_offset() {
    let plane =
        ReferencePlane::through_point(Vec3::new(0.0, 2.0, 0.0), Vec3::new(7.0, 3.0, -2.0)).unwrap();
    assert!(approx_vec3(plane.normal(), Vec3::Y));
    assert!((plane.offset() - 3.0).abs() < EPS);
    assert!(plane.signed_distance(Vec3::new(0.0, 5.0, 0.0)) > 0.0);
}

#[test]
fn zero_or_non_finite_normal_is_rejected() {
    assert_eq!(
        ReferencePlane::new(Vec3::ZERO, 0.0),
        Err(ConfigError::InvalidPlaneNormal)
    );
    assert_eq!(
        ReferencePlane::new(Vec3::new(f32::NAN, 1.0, 0.0), 0.0),
        Err(ConfigError::InvalidPlaneNormal)
    );
    assert_eq!(
        ReferencePlane::through_point(Vec3::ZERO, Vec3::ONE),
        Err(ConfigError::InvalidPlaneNormal)
    );
}

fn random_vec3(rng: &mut StdRng, extent: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

// Property: any hit lies on the plane and on the ray, in front of the origin
#[test]
fn hits_lie_on_plane_and_ray_for_random_planes() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut hits = 0;
    for _ in 0..500 {
        let normal = random_vec3(&mut rng, 1.0);
        let Ok(plane) = ReferencePlane::new(normal, rng.gen_range(-10.0..10.0)) else {
            continue;
        };
        let origin = random_vec3(&mut rng, 20.0);
        let dir = random_vec3(&mut rng, 1.0);
        if dir.length() < 0.1 {
            continue;
        }
        let ray = Ray::new(origin, dir);
        if let Some(hit) = plane.intersect(&ray) {
            let along = hit - origin;
            if along.length() > 500.0 {
                continue;
            }
            hits += 1;
            let tol = 1e-4 * (1.0 + along.length() + origin.length());
            assert!(plane.signed_distance(hit).abs() < tol, "off plane: {hit:?}");
            assert!(along.dot(ray.direction) >= -tol, "hit behind origin");
            assert!(along.cross(ray.direction).length() < tol, "off ray");
        }
    }
    assert!(hits > 100, "expected plenty of hits, got {hits}");
}

#[test]
fn clamp_to_viewport_pins_to_bounds() {
    let vp = Viewport::new(800.0, 600.0);
    assert_eq!(
        clamp_to_viewport(Vec2::new(850.0, 650.0), vp),
        Vec2::new(800.0, 600.0)
    );
    assert_eq!(clamp_to_viewport(Vec2::new(-5.0, -1.0), vp), Vec2::ZERO);
    assert_eq!(
        clamp_to_viewport(Vec2::new(400.0, 300.0), vp),
        Vec2::new(400.0, 300.0)
    );
}

#[test]
fn viewport_degeneracy() {
    assert!(Viewport::new(0.0, 600.0).is_degenerate());
    assert!(Viewport::new(800.0, -1.0).is_degenerate());
    assert!(Viewport::new(f32::INFINITY, 600.0).is_degenerate());
    assert!(!Viewport::new(1.0, 1.0).is_degenerate());
}
