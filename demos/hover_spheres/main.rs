//! Hover highlighting demo
//!
//! Two overlapping spheres, a third smaller one and a ground plane. Move the
//! pointer over a sphere to outline it; the ground is not pickable.
//!
//! Run with `cargo run --example hover_spheres`.

use glint::prelude::*;

fn build_scene(graph: &mut Graph) {
    let spheres = [
        ("sphere1", 3.0, [0.0, 0.0, 0.0], [0.9, 0.9, 0.9]),
        ("sphere2", 2.5, [1.0, 1.0, 0.0], [0.3, 0.5, 0.9]),
        ("sphere3", 2.0, [2.5, 0.5, 0.0], [0.3, 0.8, 0.4]),
    ];

    for (name, diameter, [x, y, z], [r, g, b]) in spheres {
        let mesh = Arc::new(Mesh::from_geometry(&generate_sphere(diameter, 32, 32)));
        let id = graph.add_object(name, mesh);
        graph.set_material(
            id,
            Some(StandardMaterial::new(name).with_diffuse(r, g, b).with_ambient(0.1, 0.1, 0.1).into_ref()),
        );
        if let Some(sphere) = graph.object_mut(id) {
            sphere.set_position(x, y, z);
        }
    }

    let ground = graph.add_object("ground", Arc::new(Mesh::from_geometry(&generate_ground(6.0, 6.0, 2))));
    graph.set_material(
        ground,
        Some(StandardMaterial::new("ground").with_diffuse(0.5, 0.5, 0.5).into_ref()),
    );
    if let Some(ground) = graph.object_mut(ground) {
        ground.pickable = false;
        ground.set_position(0.0, -1.5, 0.0);
    }

    graph.add_light(HemisphericLight::new("light", Vector3::new(0.0, 1.0, 0.0)).with_intensity(0.7));
}

fn main() -> anyhow::Result<()> {
    glint::init_logging();

    let options = HostOptions::default()
        .with_engine(EngineOptions::default().with_antialias(true))
        .with_scene(SceneOptions::default().with_clear_color(0.1, 0.1, 0.15, 1.0));

    GlintApp::new()?
        .with_title("glint - hover spheres")
        .with_options(options)
        .on_scene_ready(build_scene)
        .with_camera(
            |_| {
                let mut camera = FreeCamera::new("camera1", Vector3::new(0.0, 5.0, -10.0));
                camera.set_target(Vector3::new(0.0, 0.0, 0.0));
                camera
            },
            CameraOptions::default(),
        )
        .run()?;

    Ok(())
}
