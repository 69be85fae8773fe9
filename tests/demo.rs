use tricolor::demo::{self, DEMO_LOCATIONS};
use tricolor::draw::DrawMesh;
use tricolor::{Ellipsoid, IndexBuffer, Primitive, PrimitiveCollection, PrimitiveType};

#[test]
fn demo_scene_assembles_into_one_mesh() {
    let geometry = demo::demo_geometry().unwrap().create_geometry().unwrap();

    // four triangles, three corners each, no deduplication
    assert_eq!(geometry.vertex_count(), 12);
    assert_eq!(geometry.triangle_count(), 4);
    assert_eq!(geometry.primitive_type, PrimitiveType::Triangles);
    assert!(matches!(geometry.indices, IndexBuffer::U16(_)));
    assert!(geometry.indices.iter().all(|i| i < 12));
}

#[test]
fn demo_bounding_sphere_encloses_sources() {
    let ellipsoid = Ellipsoid::wgs84();
    let geometry = demo::demo_geometry().unwrap().create_geometry().unwrap();

    for &(longitude, latitude, _) in &DEMO_LOCATIONS {
        let ground = ellipsoid.from_degrees(longitude, latitude, 0.0);
        assert!(geometry.bounding_sphere.contains(&ground, 1e-9));
    }
    for i in 0..geometry.vertex_count() {
        assert!(geometry.bounding_sphere.contains(&geometry.position(i).unwrap(), 1e-9));
    }
}

#[test]
fn demo_colors_keep_reduced_alpha() {
    let geometry = demo::demo_geometry().unwrap().create_geometry().unwrap();
    assert!(geometry.attributes.color.chunks_exact(4).all(|c| c[3] == 180));
}

#[test]
fn raised_vertex_is_flattened() {
    let ellipsoid = Ellipsoid::wgs84();
    let geometry = demo::demo_geometry().unwrap().create_geometry().unwrap();
    for i in 0..geometry.vertex_count() {
        let c = ellipsoid
            .cartesian_to_cartographic(&geometry.position(i).unwrap())
            .unwrap();
        assert!(c.height.abs() < 1e-3);
    }
}

#[test]
fn demo_primitive_is_added_to_the_scene() {
    let mut primitives: Vec<Primitive> = Vec::new();
    let index = primitives.add(demo::demo_primitive().unwrap());
    assert_eq!(index, 0);
    assert_eq!(PrimitiveCollection::len(&primitives), 1);

    let primitive = &primitives[0];
    assert!(!primitive.asynchronous);
    assert!(primitive.appearance.translucent());
    assert_eq!(primitive.depth_fail_appearance.as_ref(), Some(&primitive.appearance));
}

#[test]
fn demo_preview_has_colored_pixels() {
    let geometry = demo::demo_geometry().unwrap().create_geometry().unwrap();
    let image = geometry.draw(128, 128, &Ellipsoid::wgs84());
    assert_eq!(image.dimensions(), (128, 128));
    assert!(image.pixels().any(|p| p.0[3] > 0));
}

#[test]
fn demo_triangles_need_every_vertex() {
    let vertices = demo::demo_vertices(&Ellipsoid::wgs84()).unwrap();
    assert_eq!(demo::demo_triangles(&vertices).unwrap().len(), 4);
    assert_eq!(
        demo::demo_triangles(&vertices[..3]).unwrap_err(),
        tricolor::Error::MissingVertex(4)
    );
}
