use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::{
    ContainmentOptions, ContainmentProbe, MeshError, PointContainment, PreparedHull, Quat,
    ReferencePoint, Tolerance, Transform, TriMesh, Vec3, point_in_mesh,
};

fn classify(mesh: &TriMesh, transform: &Transform, point: Vec3) -> PointContainment {
    point_in_mesh(mesh, transform, point, ContainmentOptions::default()).unwrap()
}

fn with_reference(reference: ReferencePoint) -> ContainmentOptions {
    ContainmentOptions {
        reference,
        ..ContainmentOptions::default()
    }
}

fn random_transform(rng: &mut StdRng, scale_range: std::ops::Range<f64>) -> Transform {
    let rotation = Quat::euler(
        rng.random_range(-180.0..180.0),
        rng.random_range(-90.0..90.0),
        rng.random_range(-180.0..180.0),
    );
    let scale = Vec3::new(
        rng.random_range(scale_range.clone()),
        rng.random_range(scale_range.clone()),
        rng.random_range(scale_range),
    );
    let position = Vec3::new(
        rng.random_range(-20.0..20.0),
        rng.random_range(-20.0..20.0),
        rng.random_range(-20.0..20.0),
    );
    Transform::new(position, rotation, scale)
}

/// Samples local points around the unit cube and checks the hull against the
/// analytic answer, skipping a thin shell around the surface.
fn check_random_cube_queries(seed: u64, scale_range: std::ops::Range<f64>, options: ContainmentOptions) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mesh = TriMesh::unit_cube();
    let margin = 1e-6;

    for _ in 0..20 {
        let transform = random_transform(&mut rng, scale_range.clone());
        let hull = PreparedHull::build(&mesh, &transform, options).unwrap();

        for _ in 0..100 {
            let local = Vec3::new(
                rng.random_range(-0.8..0.8),
                rng.random_range(-0.8..0.8),
                rng.random_range(-0.8..0.8),
            );
            let extent = local.abs();
            let max_extent = extent.x.max(extent.y).max(extent.z);
            if (max_extent - 0.5).abs() < margin {
                continue;
            }

            let world = transform.apply_point(local);
            let result = hull.classify(world);
            assert_eq!(
                result.is_inside(),
                max_extent < 0.5,
                "local {local} world {world} under {transform:?}"
            );
        }
    }
}

#[test]
fn unit_cube_at_origin() {
    let cube = TriMesh::unit_cube();
    let t = Transform::IDENTITY;

    assert_eq!(classify(&cube, &t, Vec3::ZERO), PointContainment::Inside);
    assert_eq!(classify(&cube, &t, Vec3::new(0.49, 0.49, 0.49)), PointContainment::Inside);
    assert_eq!(classify(&cube, &t, Vec3::new(0.51, 0.0, 0.0)), PointContainment::Outside);
    assert_eq!(
        classify(&cube, &t, Vec3::new(10.0, 0.0, 0.0)),
        PointContainment::OutsideBounds
    );
}

#[test]
fn disabling_the_prefilter_reports_plain_outside() {
    let options = ContainmentOptions {
        bounds_prefilter: false,
        ..ContainmentOptions::default()
    };
    let result = point_in_mesh(
        &TriMesh::unit_cube(),
        &Transform::IDENTITY,
        Vec3::new(10.0, 0.0, 0.0),
        options,
    )
    .unwrap();
    assert_eq!(result, PointContainment::Outside);
    assert!(result.within_bounds());
}

#[test]
fn scaled_cube_contains_points_beyond_unit_extent() {
    let cube = TriMesh::unit_cube();
    let t = Transform::IDENTITY.with_uniform_scale(2.0);

    assert_eq!(classify(&cube, &t, Vec3::new(0.9, 0.0, 0.0)), PointContainment::Inside);
    assert_eq!(classify(&cube, &t, Vec3::new(0.0, -0.99, 0.99)), PointContainment::Inside);
    assert_eq!(
        classify(&cube, &t, Vec3::new(1.1, 0.0, 0.0)),
        PointContainment::OutsideBounds
    );
}

#[test]
fn origin_reference_misreads_faces_at_unit_distance() {
    // With scale 2 the +X face passes through position + normal, so the
    // exterior sample lands on the plane and counts as back side.
    let cube = TriMesh::unit_cube();
    let t = Transform::IDENTITY.with_uniform_scale(2.0);
    let options = with_reference(ReferencePoint::TransformOrigin);

    let result = point_in_mesh(&cube, &t, Vec3::new(0.9, 0.0, 0.0), options).unwrap();
    assert_eq!(result, PointContainment::Outside);

    let t = Transform::IDENTITY.with_uniform_scale(4.0);
    let result = point_in_mesh(&cube, &t, Vec3::ZERO, options).unwrap();
    assert_eq!(result, PointContainment::Outside);
    assert_eq!(classify(&cube, &t, Vec3::ZERO), PointContainment::Inside);
}

#[test]
fn origin_reference_agrees_for_small_centered_meshes() {
    let cube = TriMesh::unit_cube();
    let options = with_reference(ReferencePoint::TransformOrigin);
    let t = Transform::from_position(Vec3::new(3.0, -1.0, 2.0));

    let inside = point_in_mesh(&cube, &t, Vec3::new(3.2, -1.3, 2.4), options).unwrap();
    assert_eq!(inside, PointContainment::Inside);
    let unfiltered = ContainmentOptions {
        bounds_prefilter: false,
        ..options
    };
    let outside = point_in_mesh(&cube, &t, Vec3::new(3.55, -1.0, 2.0), unfiltered).unwrap();
    assert_eq!(outside, PointContainment::Outside);
}

#[test]
fn non_uniform_scale_stretches_the_hull() {
    let cube = TriMesh::unit_cube();
    let t = Transform::IDENTITY.with_scale(Vec3::new(4.0, 1.0, 1.0));

    assert_eq!(classify(&cube, &t, Vec3::new(1.9, 0.0, 0.0)), PointContainment::Inside);
    assert_eq!(classify(&cube, &t, Vec3::new(1.9, 0.6, 0.0)), PointContainment::OutsideBounds);
    assert_eq!(
        classify(&cube, &t, Vec3::new(2.1, 0.0, 0.0)),
        PointContainment::OutsideBounds
    );

    // Faces farther than one unit from the position defeat the origin sample.
    let options = with_reference(ReferencePoint::TransformOrigin);
    let result = point_in_mesh(&cube, &t, Vec3::ZERO, options).unwrap();
    assert_eq!(result, PointContainment::Outside);
}

#[test]
fn rotated_cube_away_from_origin() {
    let cube = TriMesh::unit_cube();
    let t = Transform::from_position(Vec3::new(5.0, 0.0, 0.0))
        .with_rotation(Quat::euler(0.0, 0.0, 45.0));

    assert_eq!(classify(&cube, &t, Vec3::new(5.6, 0.0, 0.0)), PointContainment::Inside);
    assert_eq!(classify(&cube, &t, Vec3::new(5.6, 0.6, 0.0)), PointContainment::Outside);
    assert_eq!(classify(&cube, &t, Vec3::new(5.0, 0.0, 0.6)), PointContainment::OutsideBounds);
}

#[test]
fn offset_mesh_needs_the_centroid_reference() {
    let positions = TriMesh::unit_cube()
        .positions
        .iter()
        .map(|[x, y, z]| [x + 2.5, y + 2.5, z + 2.5])
        .collect();
    let mesh = TriMesh::new(positions, TriMesh::unit_cube().indices);
    let t = Transform::IDENTITY;
    let center = Vec3::new(2.5, 2.5, 2.5);

    let hull = PreparedHull::build(&mesh, &t, ContainmentOptions::default()).unwrap();
    assert_eq!(hull.bounds().center, center);
    assert_eq!(hull.centroid(), center);
    assert_eq!(hull.classify(center), PointContainment::Inside);
    assert_eq!(hull.classify(Vec3::ZERO), PointContainment::OutsideBounds);

    let origin_mode = with_reference(ReferencePoint::TransformOrigin);
    let result = point_in_mesh(&mesh, &t, center, origin_mode).unwrap();
    assert_eq!(result, PointContainment::Outside);
}

#[test]
fn tetrahedron_cuts_corners_of_its_bounds() {
    let tetra = TriMesh::tetrahedron();
    let t = Transform::IDENTITY;

    assert_eq!(classify(&tetra, &t, Vec3::new(0.5, 0.5, 0.5)), PointContainment::Inside);
    assert_eq!(classify(&tetra, &t, Vec3::ZERO), PointContainment::Inside);
    assert_eq!(classify(&tetra, &t, Vec3::new(0.9, -0.9, 0.9)), PointContainment::Outside);
}

#[test]
fn l_prism_is_treated_as_convex_intersection() {
    let l = TriMesh::l_prism();
    let t = Transform::IDENTITY;

    assert_eq!(classify(&l, &t, Vec3::new(0.5, 0.5, 0.5)), PointContainment::Inside);
    // The notch is truly outside.
    assert_eq!(classify(&l, &t, Vec3::new(1.5, 1.5, 0.5)), PointContainment::Outside);
    // Enclosed by the surface, but beyond the inner face at x = 1.
    assert_eq!(classify(&l, &t, Vec3::new(1.5, 0.5, 0.5)), PointContainment::Outside);

    let tol = Tolerance::new(1e-9);
    let hull = PreparedHull::build(&l, &t, ContainmentOptions::default()).unwrap();
    assert!(!hull.is_convex(tol));
    for mesh in [TriMesh::unit_cube(), TriMesh::tetrahedron()] {
        let hull = PreparedHull::build(&mesh, &t, ContainmentOptions::default()).unwrap();
        assert!(hull.is_convex(tol));
    }
}

#[test]
fn random_points_in_transformed_cube_centroid_reference() {
    check_random_cube_queries(17, 0.2..5.0, ContainmentOptions::default());
    check_random_cube_queries(
        18,
        0.2..5.0,
        ContainmentOptions {
            sort_by_weight: false,
            ..ContainmentOptions::default()
        },
    );
}

#[test]
fn random_points_in_transformed_cube_origin_reference() {
    // Every face stays within one unit of the position for scales below 2.
    check_random_cube_queries(19, 0.5..1.9, with_reference(ReferencePoint::TransformOrigin));
}

#[test]
fn plane_order_does_not_change_answers() {
    let mut rng = StdRng::seed_from_u64(23);
    let mesh = TriMesh::tetrahedron();
    let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
        .with_rotation(Quat::euler(10.0, 20.0, 30.0))
        .with_scale(Vec3::new(1.5, 0.5, 2.0));
    let sorted = PreparedHull::build(&mesh, &t, ContainmentOptions::default()).unwrap();
    let unsorted = PreparedHull::build(
        &mesh,
        &t,
        ContainmentOptions {
            sort_by_weight: false,
            ..ContainmentOptions::default()
        },
    )
    .unwrap();

    for _ in 0..500 {
        let p = Vec3::new(
            rng.random_range(-2.0..4.0),
            rng.random_range(0.0..4.0),
            rng.random_range(0.0..6.0),
        );
        assert_eq!(sorted.classify(p), unsorted.classify(p), "disagree at {p}");
    }
}

#[test]
fn planes_are_sorted_by_descending_weight() {
    let mesh = TriMesh::cuboid(Vec3::new(2.0, 1.0, 0.5));
    let t = Transform::IDENTITY;

    let sorted = PreparedHull::build(&mesh, &t, ContainmentOptions::default()).unwrap();
    assert_eq!(sorted.planes().len(), 12);
    assert!(sorted.planes().windows(2).all(|w| w[0].weight() >= w[1].weight()));
    assert_eq!(sorted.planes()[0].weight(), 8.0);

    let unsorted = PreparedHull::build(
        &mesh,
        &t,
        ContainmentOptions {
            sort_by_weight: false,
            ..ContainmentOptions::default()
        },
    )
    .unwrap();
    // Mesh order: the +X face comes first.
    assert_eq!(unsorted.planes()[0].weight(), 2.0);
    assert_eq!(unsorted.planes()[0].normal(), Vec3::X);
}

#[test]
fn degenerate_triangles_are_skipped() {
    let mut mesh = TriMesh::unit_cube();
    mesh.indices.extend_from_slice(&[0, 0, 1]);

    let hull = PreparedHull::build(&mesh, &Transform::IDENTITY, ContainmentOptions::default())
        .unwrap();
    assert_eq!(hull.degenerate_face_count(), 1);
    assert_eq!(hull.planes().len(), 12);
    assert_eq!(hull.classify(Vec3::ZERO), PointContainment::Inside);
    assert_eq!(hull.classify(Vec3::new(0.51, 0.0, 0.0)), PointContainment::Outside);
}

#[test]
fn unused_vertices_do_not_shift_the_centroid() {
    let mut mesh = TriMesh::unit_cube();
    mesh.positions.push([100.0, 0.0, 0.0]);
    assert!(mesh.validate().is_ok());

    let hull = PreparedHull::build(&mesh, &Transform::IDENTITY, ContainmentOptions::default())
        .unwrap();
    assert_eq!(hull.hull_vertices().len(), 8);
    assert_eq!(hull.centroid(), Vec3::ZERO);
    assert!(hull.is_convex(Tolerance::new(1e-9)));

    assert_eq!(hull.classify(Vec3::ZERO), PointContainment::Inside);
    assert_eq!(hull.classify(Vec3::new(0.51, 0.0, 0.0)), PointContainment::Outside);
    // The stray vertex still widens the bounds, so this passes the prefilter.
    assert_eq!(hull.classify(Vec3::new(50.0, 0.0, 0.0)), PointContainment::Outside);

    let origin_mode = with_reference(ReferencePoint::TransformOrigin);
    let result = point_in_mesh(&mesh, &Transform::IDENTITY, Vec3::ZERO, origin_mode).unwrap();
    assert_eq!(result, PointContainment::Inside);
}

#[test]
fn mesh_without_area_contains_nothing() {
    let segment = TriMesh::new(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]], vec![0, 1, 2]);
    let t = Transform::IDENTITY;

    let hull = PreparedHull::build(&segment, &t, ContainmentOptions::default()).unwrap();
    assert!(hull.planes().is_empty());
    assert_eq!(hull.degenerate_face_count(), 1);
    assert_eq!(hull.classify(Vec3::new(1.0, 0.0, 0.0)), PointContainment::Outside);

    let unfiltered = ContainmentOptions {
        bounds_prefilter: false,
        ..ContainmentOptions::default()
    };
    for options in [unfiltered, with_reference(ReferencePoint::TransformOrigin)] {
        let result = point_in_mesh(&segment, &t, Vec3::new(50.0, -7.0, 3.0), options).unwrap();
        assert!(!result.is_inside(), "{options:?} reported {result:?}");
    }

    let mut probe = ContainmentProbe::new(segment, unfiltered).unwrap();
    assert_eq!(probe.query(&t, Vec3::new(1.0, 0.0, 0.0)), PointContainment::Outside);
    assert_eq!(probe.stats().plane_tests, 0);
}

#[test]
fn zero_scale_collapses_the_hull() {
    let cube = TriMesh::unit_cube();
    let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_uniform_scale(0.0);

    let hull = PreparedHull::build(&cube, &t, ContainmentOptions::default()).unwrap();
    assert_eq!(hull.degenerate_face_count(), 12);
    assert_eq!(hull.classify(Vec3::new(1.0, 2.0, 3.0)), PointContainment::Outside);
    assert_eq!(hull.classify(Vec3::ZERO), PointContainment::OutsideBounds);
}

#[test]
fn invalid_meshes_are_rejected_up_front() {
    let mut mesh = TriMesh::unit_cube();
    mesh.indices[0] = 42;
    let expected = MeshError::IndexOutOfBounds {
        triangle: 0,
        index: 42,
        vertex_count: 8,
    };

    assert_eq!(
        PreparedHull::build(&mesh, &Transform::IDENTITY, ContainmentOptions::default())
            .unwrap_err(),
        expected
    );
    assert_eq!(
        point_in_mesh(&mesh, &Transform::IDENTITY, Vec3::ZERO, ContainmentOptions::default())
            .unwrap_err(),
        expected
    );
    assert_eq!(ContainmentProbe::with_defaults(mesh).unwrap_err(), expected);
    assert_eq!(
        ContainmentProbe::with_defaults(TriMesh::default()).unwrap_err(),
        MeshError::TooFewVertices { count: 0 }
    );
}

#[test]
fn probe_reuses_hull_until_transform_changes() {
    let mut probe = ContainmentProbe::with_defaults(TriMesh::unit_cube()).unwrap();
    let here = Transform::IDENTITY;
    let there = Transform::from_position(Vec3::new(5.0, 0.0, 0.0));

    assert_eq!(probe.query(&here, Vec3::ZERO), PointContainment::Inside);
    assert_eq!(
        probe.query(&here, Vec3::new(10.0, 0.0, 0.0)),
        PointContainment::OutsideBounds
    );
    assert_eq!(probe.query(&there, Vec3::new(5.0, 0.0, 0.0)), PointContainment::Inside);
    assert_eq!(probe.query(&there, Vec3::ZERO), PointContainment::OutsideBounds);

    let stats = probe.stats();
    assert_eq!(stats.queries, 4);
    assert_eq!(stats.rebuilds, 2);
    assert_eq!(stats.cache_hits, 2);
    assert_eq!(stats.bounds_rejections, 2);
    assert_eq!(stats.plane_tests, 24);
    assert!((stats.hit_rate() - 0.5).abs() < 1e-12);
}

#[test]
fn changing_options_invalidates_the_cache() {
    let mut probe = ContainmentProbe::with_defaults(TriMesh::unit_cube()).unwrap();
    let t = Transform::IDENTITY;
    let far = Vec3::new(10.0, 0.0, 0.0);

    assert_eq!(probe.query(&t, far), PointContainment::OutsideBounds);

    probe.set_options(ContainmentOptions::default());
    probe.query(&t, far);
    assert_eq!(probe.stats().rebuilds, 1);

    probe.set_options(ContainmentOptions {
        bounds_prefilter: false,
        ..ContainmentOptions::default()
    });
    assert_eq!(probe.query(&t, far), PointContainment::Outside);
    assert_eq!(probe.stats().rebuilds, 2);
    assert!(!probe.options().bounds_prefilter);

    probe.invalidate();
    probe.prepare(&t);
    assert_eq!(probe.stats().rebuilds, 3);
    assert_eq!(probe.stats().queries, 3);
}

#[test]
fn empty_probe_has_zero_hit_rate() {
    let probe = ContainmentProbe::with_defaults(TriMesh::tetrahedron()).unwrap();
    assert_eq!(probe.stats().hit_rate(), 0.0);
    assert_eq!(probe.mesh().triangle_count(), 4);
}
