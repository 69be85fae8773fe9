use std::fs;

use tricolor::{Color, GeometryOptions, MultiColorTriangleGeometry, VertexFormat};

fn square_geometry(vertex_format: VertexFormat) -> tricolor::Geometry {
    let e = tricolor::Ellipsoid::wgs84();
    let positions = vec![
        e.from_degrees(0.0, 0.0, 0.0),
        e.from_degrees(1.0, 0.0, 0.0),
        e.from_degrees(0.0, 1.0, 0.0),
        e.from_degrees(1.0, 0.0, 0.0),
        e.from_degrees(1.0, 1.0, 0.0),
        e.from_degrees(0.0, 1.0, 0.0),
    ];
    let colors = vec![Color::RED, Color::GREEN, Color::BLUE, Color::GREEN, Color::WHITE, Color::BLUE];
    MultiColorTriangleGeometry::new(GeometryOptions {
        vertex_format,
        ..GeometryOptions::from_positions(positions, colors)
    })
    .unwrap()
    .create_geometry()
    .unwrap()
}

#[test]
fn obj_lists_colored_vertices_and_faces() {
    let geometry = square_geometry(VertexFormat::POSITION_AND_COLOR);
    let path = std::env::temp_dir().join(format!("tricolor-export-{}.obj", std::process::id()));
    geometry.export_obj(&path).unwrap();

    let obj = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).ok();

    let vertices: Vec<&str> = obj.lines().filter(|l| l.starts_with("v ")).collect();
    let faces: Vec<&str> = obj.lines().filter(|l| l.starts_with("f ")).collect();
    assert_eq!(vertices.len(), 6);
    assert_eq!(faces.len(), 2);
    assert!(vertices.iter().all(|v| v.split_whitespace().count() == 7));
    for face in faces {
        for index in face.split_whitespace().skip(1) {
            let index: usize = index.parse().unwrap();
            assert!((1..=6).contains(&index));
        }
    }
}

#[test]
fn obj_export_needs_positions() {
    let geometry = square_geometry(VertexFormat {
        position: false,
        ..VertexFormat::POSITION_AND_COLOR
    });
    let path = std::env::temp_dir().join("tricolor-never-written.obj");
    let err = geometry.export_obj(&path).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}
