//! Support pipeline: scan, route and build supports for the whole scene.
//!
//! Each run regenerates from scratch. Existing supports are cleared
//! first, and only the models themselves feed the scan and the collision
//! index, so supports never obstruct their own regeneration.

use mesh_collide::{SceneEntry, SceneIndex};
use mesh_support::{build_support, SupportDims};
use slice_profile::SupportPreset;
use support_route::route_touchpoints;
use support_scan::{scan_scene, ScanMesh};
use support_types::{RouteConfig, ScanConfig};
use tracing::{info, warn};

use crate::registry::{MeshId, MeshRegistry};

/// Outcome counts of one support generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupportReport {
    /// Touchpoints the scan discovered.
    pub found: usize,
    /// Touchpoints the router attached a path to.
    pub routed: usize,
    /// Touchpoints that ended without a support mesh.
    pub skipped: usize,
}

/// Scan the scene, route every touchpoint and attach the built supports.
///
/// `scene_index` is rebuilt only when stale against the current scene,
/// so repeated passes over an unchanged scene reuse the index.
pub fn generate_supports(
    registry: &mut MeshRegistry,
    scene_index: &mut Option<SceneIndex>,
    preset: &SupportPreset,
    scan_config: &ScanConfig,
    route_config: &RouteConfig,
) -> SupportReport {
    registry.clear_all_supports();

    let (mut touchpoints, occupancy) = {
        let scan_meshes: Vec<ScanMesh<'_>> = registry
            .iter()
            .map(|(id, scene)| ScanMesh {
                id: id.index(),
                mesh: scene.mesh(),
                transform: scene.transform(),
            })
            .collect();
        let scan = scan_scene(&scan_meshes, scan_config);
        (scan.touchpoints, scan.occupancy)
    };

    let routed = {
        let entries: Vec<SceneEntry<'_>> = registry
            .iter()
            .map(|(id, scene)| SceneEntry {
                id: id.index(),
                mesh: scene.mesh(),
                transform: scene.transform(),
            })
            .collect();
        if scene_index
            .as_ref()
            .map_or(true, |index| index.is_stale(&entries))
        {
            *scene_index = Some(SceneIndex::build(&entries));
        }
        let index = scene_index.get_or_insert_with(|| SceneIndex::build(&entries));
        route_touchpoints(&mut touchpoints, index, &occupancy, route_config)
    };

    let dims = SupportDims::from_millimetres(
        preset.head,
        preset.connection_sphere,
        preset.body,
        preset.platform_width,
        preset.platform_height,
    );
    let mut attached = 0_usize;
    for touchpoint in &touchpoints {
        let Some(path) = touchpoint.path.as_ref() else {
            continue;
        };
        match build_support(path, touchpoint.position, &dims) {
            Ok(mesh) => match registry.get_mut(MeshId::from_index(touchpoint.mesh)) {
                Some(scene) => {
                    scene.add_support(mesh);
                    attached += 1;
                }
                None => {
                    warn!(mesh = touchpoint.mesh, "touchpoint references a removed mesh");
                }
            },
            Err(err) => {
                warn!(error = %err, "support construction failed");
            }
        }
    }

    let report = SupportReport {
        found: touchpoints.len(),
        routed,
        skipped: touchpoints.len() - attached,
    };
    info!(
        found = report.found,
        routed = report.routed,
        skipped = report.skipped,
        "support generation complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SceneMesh;
    use mesh_transform::Transform3D;
    use mesh_types::unit_cube;
    use nalgebra::Vector3;

    fn floating_cube_registry() -> (MeshRegistry, MeshId) {
        let mut registry = MeshRegistry::new();
        let lifted = Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0));
        let id = registry.insert(SceneMesh::with_transform(unit_cube(), lifted));
        (registry, id)
    }

    #[test]
    fn a_floating_cube_gains_supports() {
        let (mut registry, id) = floating_cube_registry();
        let mut index = None;

        let report = generate_supports(
            &mut registry,
            &mut index,
            &SupportPreset::default(),
            &ScanConfig::default(),
            &RouteConfig::default(),
        );

        assert!(report.found > 0);
        assert_eq!(report.routed, report.found);
        assert_eq!(report.skipped, 0);
        assert_eq!(registry.get(id).unwrap().supports().len(), report.found);
        assert!(index.is_some());
    }

    #[test]
    fn regeneration_replaces_rather_than_accumulates() {
        let (mut registry, id) = floating_cube_registry();
        let mut index = None;

        let first = generate_supports(
            &mut registry,
            &mut index,
            &SupportPreset::default(),
            &ScanConfig::default(),
            &RouteConfig::default(),
        );
        let second = generate_supports(
            &mut registry,
            &mut index,
            &SupportPreset::default(),
            &ScanConfig::default(),
            &RouteConfig::default(),
        );

        assert_eq!(first, second);
        assert_eq!(registry.get(id).unwrap().supports().len(), second.found);
    }

    #[test]
    fn a_resting_cube_needs_nothing() {
        let mut registry = MeshRegistry::new();
        registry.insert(SceneMesh::new(unit_cube()));
        let mut index = None;

        let report = generate_supports(
            &mut registry,
            &mut index,
            &SupportPreset::default(),
            &ScanConfig::default(),
            &RouteConfig::default(),
        );

        assert_eq!(report, SupportReport::default());
    }

    #[test]
    fn an_empty_scene_reports_zeroes() {
        let mut registry = MeshRegistry::new();
        let mut index = None;

        let report = generate_supports(
            &mut registry,
            &mut index,
            &SupportPreset::default(),
            &ScanConfig::default(),
            &RouteConfig::default(),
        );

        assert_eq!(report, SupportReport::default());
    }
}
