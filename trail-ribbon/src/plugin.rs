use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;

use crate::point_buffer::PointBuffer;
use crate::settings::TrailSettings;
use crate::strip_mesh::{VertexStream, build_strip};

/// Trail state attached to the anchor entity. The entity's `GlobalTransform`
/// supplies the sample position and the right axis each frame.
#[derive(Component, Debug, Default)]
pub struct TrailRibbon {
    pub settings: TrailSettings,
    buffer: PointBuffer,
}

impl TrailRibbon {
    pub fn new(settings: TrailSettings) -> Self {
        Self {
            settings,
            buffer: PointBuffer::new(),
        }
    }

    /// Drop all points and the sampling reference. The mesh is blanked by
    /// the next frame step, or immediately via [`TrailClearEvent`].
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &PointBuffer {
        &self.buffer
    }
}

/// Host-triggered reset of one trail entity.
#[derive(Event, Debug, Clone, Copy)]
pub struct TrailClearEvent {
    pub entity: Entity,
}

/// Per-frame trail update plus the attach/clear plumbing around it.
pub struct TrailRibbonPlugin;

impl Plugin for TrailRibbonPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TrailClearEvent>().add_systems(
            Update,
            (
                attach_ribbon_visuals,
                handle_trail_clear_events,
                update_trail_ribbons,
            )
                .chain(),
        );
    }
}

/// Give fresh trail entities an empty strip mesh and the default ribbon
/// material, unless the host already provided its own.
fn attach_ribbon_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    ribbons: Query<
        (
            Entity,
            Option<&Mesh3d>,
            Option<&MeshMaterial3d<StandardMaterial>>,
        ),
        Added<TrailRibbon>,
    >,
) {
    for (entity, mesh, material) in &ribbons {
        if mesh.is_none() {
            let strip = Mesh::new(
                PrimitiveTopology::TriangleStrip,
                RenderAssetUsages::default(),
            );
            // The strip trails far behind the entity origin, so the mesh
            // AABB computed at spawn time is useless for culling.
            commands
                .entity(entity)
                .insert((Mesh3d(meshes.add(strip)), NoFrustumCulling));
        }
        if material.is_none() {
            commands
                .entity(entity)
                .insert(MeshMaterial3d(materials.add(ribbon_material())));
        }
    }
}

fn ribbon_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        cull_mode: None,
        double_sided: true,
        ..default()
    }
}

/// The frame step: gate-sample the anchor position, age and evict points,
/// rebuild the strip, and write it into the entity's mesh asset.
fn update_trail_ribbons(
    time: Res<Time>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut ribbons: Query<(&GlobalTransform, &mut TrailRibbon, &Mesh3d)>,
) {
    let delta = time.delta_secs();
    for (global_transform, mut ribbon, mesh_handle) in &mut ribbons {
        let ribbon = &mut *ribbon;
        if !ribbon.settings.enabled {
            continue;
        }
        if let Err(err) = ribbon.settings.validate() {
            warn_once!("trail ribbon settings rejected, skipping update: {err}");
            continue;
        }

        let anchor = global_transform.translation();
        let right_axis = global_transform.right().as_vec3();
        ribbon.buffer.sample(
            anchor,
            right_axis,
            ribbon.settings.start_width,
            ribbon.settings.end_width,
            ribbon.settings.motion_delta,
        );
        ribbon.buffer.advance(delta, ribbon.settings.life_span);

        // Vertices are emitted in the render node's local space.
        let to_local = global_transform.affine().inverse();
        let stream = build_strip(&ribbon.buffer, &ribbon.settings, &to_local);
        if let Some(mesh) = meshes.get_mut(&mesh_handle.0) {
            stream.write_mesh(mesh);
        }
    }
}

/// Apply [`TrailClearEvent`]s: empty the buffer and blank the mesh right
/// away, so a disabled (frozen) trail disappears too.
fn handle_trail_clear_events(
    mut events: EventReader<TrailClearEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut ribbons: Query<(&mut TrailRibbon, Option<&Mesh3d>)>,
) {
    for event in events.read() {
        let Ok((mut ribbon, mesh_handle)) = ribbons.get_mut(event.entity) else {
            warn!("TrailClearEvent for entity {:?} without a TrailRibbon", event.entity);
            continue;
        };
        ribbon.clear();
        if let Some(mesh) = mesh_handle.and_then(|handle| meshes.get_mut(&handle.0)) {
            VertexStream::default().write_mesh(mesh);
        }
    }
}
