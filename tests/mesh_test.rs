use spholyhedra::{
    MeshConfig, ShapeKind, SpholyError, generate_mesh,
    pipeline::mesh_field,
    stl::{save_stl, write_stl},
    types::{Bounds, Point, Value},
};

#[test]
fn cube_mesh_hugs_the_level_set() {
    let field = ShapeKind::Hexahedron
        .params()
        .with_radius(10.0)
        .with_exponent(4.0)
        .build()
        .unwrap();
    let config = MeshConfig { step: 1.0, ..Default::default() };
    let mesh = generate_mesh(&field, &config).unwrap();

    assert!(mesh.triangle_count() > 500);
    assert_eq!(mesh.vertices.len(), 3 * mesh.triangle_count());
    assert_eq!(mesh.normals.len(), mesh.vertices.len());

    let bounds = field.bounds(1.0);
    for v in &mesh.vertices {
        assert!(bounds.contains(v));
        assert!(field.evaluate(v).abs() < 0.05, "vertex {v} is off the surface");
    }

    // Face centres sit on the surface, so the mesh reaches ±10 on every axis.
    // Grid corners are not aligned with them, hence the tolerance.
    let extent = mesh.bounds().unwrap();
    for axis in 0..3 {
        assert!((extent.max[axis] - 10.0).abs() < 0.1);
        assert!((extent.min[axis] + 10.0).abs() < 0.1);
    }
}

#[test]
fn triangles_face_outwards() {
    let field = ShapeKind::Octahedron.params().with_radius(5.0).build().unwrap();
    let mesh = generate_mesh(&field, &MeshConfig { step: 0.5, ..Default::default() }).unwrap();

    let mut inward = 0;
    for tri in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.tri_coords(tri);
        let centroid = (a.coords + b.coords + c.coords) / 3.0;
        if mesh.tri_normal(tri).dot(&centroid) < 0.0 {
            inward += 1;
        }
    }
    // Slivers can have noisy normals; the winding itself must face out.
    assert!((inward as Value) < 0.01 * mesh.triangle_count() as Value);
}

#[test]
fn every_shape_meshes() {
    for kind in ShapeKind::ALL {
        let field = kind.params().with_radius(10.0).build().unwrap();
        let mesh = generate_mesh(&field, &MeshConfig { step: 2.0, ..Default::default() })
            .unwrap_or_else(|err| panic!("{kind}: {err}"));
        assert!(mesh.triangle_count() > 50, "{kind}");
    }
}

#[test]
fn offset_center_moves_the_mesh() {
    let center = Point::new(30.0, 0.0, -5.0);
    let field = ShapeKind::Dodecahedron
        .params()
        .with_radius(4.0)
        .with_center(center)
        .build()
        .unwrap();
    let mesh = generate_mesh(&field, &MeshConfig { step: 0.5, ..Default::default() }).unwrap();
    for v in &mesh.vertices {
        assert!((v - center).norm() < 8.0);
    }
}

#[test]
fn surface_outside_the_box_is_empty() {
    let field = ShapeKind::Hexahedron.params().build().unwrap();
    let far_away = Bounds::new(Point::new(5.0, 5.0, 5.0), Point::new(6.0, 6.0, 6.0));
    assert!(matches!(
        mesh_field(&field, far_away, &MeshConfig::default()),
        Err(SpholyError::EmptyMesh)
    ));
}

#[test]
fn bad_step_is_rejected() {
    let field = ShapeKind::Hexahedron.params().build().unwrap();
    let config = MeshConfig { step: 0.0, ..Default::default() };
    assert!(matches!(
        generate_mesh(&field, &config),
        Err(SpholyError::InvalidBounds(_))
    ));
}

#[test]
fn stl_file_round_trip_size() {
    let field = ShapeKind::Tetrahedron.params().with_radius(3.0).build().unwrap();
    let mesh = generate_mesh(&field, &MeshConfig { step: 0.5, ..Default::default() }).unwrap();

    let mut buf = Vec::new();
    write_stl(&mesh, &mut buf).unwrap();
    assert_eq!(buf.len(), 84 + 50 * mesh.triangle_count());

    let path = std::env::temp_dir().join(format!("spholyhedra-{}.stl", std::process::id()));
    save_stl(&mesh, &path).unwrap();
    let written = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(written, buf);
}

#[test]
fn unwritable_path_is_an_io_error() {
    let field = ShapeKind::Hexahedron.params().build().unwrap();
    let mesh = generate_mesh(&field, &MeshConfig { step: 0.5, ..Default::default() }).unwrap();
    let path = std::env::temp_dir().join("spholyhedra-missing-dir").join("out.stl");
    assert!(matches!(save_stl(&mesh, &path), Err(SpholyError::Io(_))));
}
