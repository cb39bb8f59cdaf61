use bevy::asset::{AssetMetaCheck, RenderAssetUsages};
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::NoFrustumCulling;
use bevy::window::PresentMode;
use bevy_common_assets::json::JsonAssetPlugin;
use trail_ribbon::{TrailClearEvent, TrailRibbon, TrailRibbonPlugin, TrailSettings};

const PRESET_PATH: &'static str = "presets/comet.trail.json";

const GRID_HALF_EXTENT: f32 = 8.0;
const GRID_LINE_COUNT: u32 = 16;

#[derive(Resource, Default)]
struct PresetLoader {
    handle: Option<Handle<TrailSettings>>,
    loaded: bool,
}

/// Marker for the entity the trail hangs from.
#[derive(Component)]
struct Anchor;

#[derive(Component)]
struct FpsText;

fn main() {
    let mut app = create_app();

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}

/// Create the demo application
fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(JsonAssetPlugin::<TrailSettings>::new(&["trail.json"]))
        .add_plugins(TrailRibbonPlugin);

    app.init_resource::<PresetLoader>()
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                load_preset_system,
                drive_anchor,
                trail_control_system,
                fps_text_update_system,
            ),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "trail-viewer".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

/// Load the trail preset JSON and apply it to the anchor once it arrives
fn load_preset_system(
    mut preset_loader: ResMut<PresetLoader>,
    asset_server: Res<AssetServer>,
    presets: Res<Assets<TrailSettings>>,
    mut trails: Query<&mut TrailRibbon, With<Anchor>>,
) {
    // Start loading if not already started
    if preset_loader.handle.is_none() {
        println!("Loading trail preset from: {}", PRESET_PATH);
        preset_loader.handle = Some(asset_server.load(PRESET_PATH));
        return;
    }

    // Check if loaded and not yet applied
    if !preset_loader.loaded {
        if let Some(ref handle) = preset_loader.handle {
            if let Some(preset) = presets.get(handle) {
                match preset.validate() {
                    Ok(()) => {
                        for mut trail in &mut trails {
                            trail.settings = preset.clone();
                        }
                        println!("Applied trail preset: {}", PRESET_PATH);
                    }
                    Err(err) => {
                        eprintln!("Rejected trail preset {}: {}", PRESET_PATH, err);
                    }
                }
                preset_loader.loaded = true;
            }
        }
    }
}

/// Setup camera, lighting, ground grid, anchor, and UI
fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    println!("=== TRAIL RIBBON VIEWER ===");
    println!("  T: toggle trail emission");
    println!("  C: clear the trail");
    println!("  X: toggle scaled/normalized UVs");

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-6.0, 6.0, 10.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
    ));

    spawn_lighting(&mut commands);
    spawn_ground_grid(&mut commands, &mut meshes, &mut materials);
    spawn_anchor(&mut commands, &mut meshes, &mut materials);
    spawn_ui(&mut commands);
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            0.8,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

/// Flat reference grid so the trail's motion reads against the ground
fn spawn_ground_grid(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    let grid_material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.25),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    let mut vertices: Vec<[f32; 3]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let spacing = 2.0 * GRID_HALF_EXTENT / GRID_LINE_COUNT as f32;
    for i in 0..=GRID_LINE_COUNT {
        let offset = -GRID_HALF_EXTENT + i as f32 * spacing;

        let base = vertices.len() as u32;
        vertices.push([offset, 0.0, -GRID_HALF_EXTENT]);
        vertices.push([offset, 0.0, GRID_HALF_EXTENT]);
        vertices.push([-GRID_HALF_EXTENT, 0.0, offset]);
        vertices.push([GRID_HALF_EXTENT, 0.0, offset]);
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 3]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(grid_material),
        Transform::IDENTITY,
        NoFrustumCulling,
    ));
}

/// Spawn the moving anchor with its trail and a small marker so the anchor
/// itself stays visible ahead of the ribbon
fn spawn_anchor(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    let marker_material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.85, 0.3),
        unlit: true,
        ..default()
    });

    commands
        .spawn((
            TrailRibbon::new(TrailSettings::default()),
            Transform::from_translation(anchor_position(0.0)),
            Anchor,
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Sphere::new(0.12))),
                MeshMaterial3d(marker_material),
            ));
        });
}

/// Parametric swoop covering curvature, speed changes, and height
fn anchor_position(t: f32) -> Vec3 {
    Vec3::new(
        4.0 * t.sin(),
        1.5 + 0.8 * (1.7 * t).sin(),
        4.0 * (0.8 * t).cos(),
    )
}

fn anchor_velocity(t: f32) -> Vec3 {
    Vec3::new(
        4.0 * t.cos(),
        0.8 * 1.7 * (1.7 * t).cos(),
        -4.0 * 0.8 * (0.8 * t).sin(),
    )
}

/// Fly the anchor along the curve, nose pointed along the velocity so the
/// ribbon's right axis stays perpendicular to the motion
fn drive_anchor(time: Res<Time>, mut anchors: Query<&mut Transform, With<Anchor>>) {
    let t = time.elapsed_secs();
    for mut transform in &mut anchors {
        transform.translation = anchor_position(t);
        transform.look_to(anchor_velocity(t), Vec3::Y);
    }
}

/// Keyboard controls for the demo trail
fn trail_control_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut clear_events: EventWriter<TrailClearEvent>,
    mut trails: Query<(Entity, &mut TrailRibbon), With<Anchor>>,
) {
    for (entity, mut trail) in &mut trails {
        if keyboard.just_pressed(KeyCode::KeyT) {
            trail.settings.enabled = !trail.settings.enabled;
            println!("trail emission: {}", trail.settings.enabled);
        }
        if keyboard.just_pressed(KeyCode::KeyX) {
            trail.settings.scale_texture = !trail.settings.scale_texture;
            println!("scaled UVs: {}", trail.settings.scale_texture);
        }
        if keyboard.just_pressed(KeyCode::KeyC) {
            clear_events.write(TrailClearEvent { entity });
            println!("trail cleared");
        }
    }
}

fn spawn_ui(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("T toggle | C clear | X uv mode"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.7)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
            ));
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
