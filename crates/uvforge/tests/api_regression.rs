//! Public API regression suite for the pipeline crates.
//!
//! These tests pin the API surface the facade re-exports, organized in
//! tiers of increasing pipeline depth:
//!
//! - Tier 1: Foundation (spatial grid, geometry types, transforms)
//! - Tier 2: Scene analysis (collision index, free-space scan)
//! - Tier 3: Support generation (routing, strut construction)
//! - Tier 4: Slicing primitives (profile, raster, script)
//! - Tier 5: Orchestration (registry, storage, engine runs)
//!
//! A failure here after an API change flags a breaking change that needs
//! a changelog entry and a version bump.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::cast_lossless)]

use uvforge::prelude::*;

// =============================================================================
// TIER 1: Foundation - Spatial Grid, Geometry Types, Transforms
// =============================================================================

mod tier1_foundation {
    use super::*;
    use uvforge::spatial::{raycast, Ray, VoxelCoord, VoxelGrid};
    use uvforge::types::{Point3, Vector3};

    #[test]
    fn voxel_grid_round_trips_world_points() {
        let mut grid: VoxelGrid<bool> = VoxelGrid::new(0.5);
        grid.set_at_world(Point3::new(1.2, 0.3, 2.7), true);

        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get_at_world(Point3::new(1.2, 0.3, 2.7)), Some(&true));

        let coord = grid.world_to_grid(Point3::new(1.2, 0.3, 2.7));
        assert_eq!(coord, VoxelCoord { x: 2, y: 0, z: 5 });
        assert!(grid.contains(coord));
    }

    #[test]
    fn raycast_walks_until_blocked() {
        let mut grid: VoxelGrid<bool> = VoxelGrid::new(1.0);
        grid.set(VoxelCoord { x: 3, y: 0, z: 0 }, true);

        let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vector3::new(1.0, 0.0, 0.0));
        let hit = raycast(&ray, &grid, 10.0, |blocked| *blocked).unwrap();
        assert_eq!(hit.coord, VoxelCoord { x: 3, y: 0, z: 0 });
        assert!(hit.t > 0.0);

        let miss = raycast(&ray, &grid, 1.0, |blocked| *blocked);
        assert!(miss.is_none());
    }

    #[test]
    fn mesh_construction_and_counts() {
        let mesh = IndexedMesh::new();
        assert!(mesh.vertices.is_empty());
        assert!(mesh.faces.is_empty());

        let vertices = vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(0.0, 1.0, 0.0),
        ];
        let mesh = IndexedMesh::from_parts(vertices, vec![[0, 1, 2]]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn unit_cube_shape_and_bounds() {
        let cube = unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.face_count(), 12);

        let bounds = cube.bounds().unwrap();
        assert!((bounds.min.x - 0.0).abs() < f64::EPSILON);
        assert!((bounds.max.z - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn transforms_compose_and_invert() {
        let lift = Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0));
        let grow = Transform3D::from_uniform_scale(2.0);
        let combined = grow.then(&lift);

        let moved = combined.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((moved.x - 2.0).abs() < 1e-12);
        assert!((moved.z - 2.0).abs() < 1e-12);

        let back = combined.inverse().unwrap().transform_point(&moved);
        assert!((back.x - 1.0).abs() < 1e-12);

        let baked = combined.apply_to_mesh(&unit_cube());
        let top = baked.bounds().unwrap();
        assert!((top.max.z - 4.0).abs() < 1e-12);
    }
}

// =============================================================================
// TIER 2: Scene Analysis - Collision Index, Free-Space Scan
// =============================================================================

mod tier2_scene_analysis {
    use super::*;
    use uvforge::collide::{Ray, SceneEntry};
    use uvforge::types::{Point3, Vector3};

    fn lifted_cube_entry(cube: &IndexedMesh) -> SceneEntry<'_> {
        SceneEntry {
            id: 0,
            mesh: cube,
            transform: Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0)),
        }
    }

    #[test]
    fn scene_index_answers_ray_queries() {
        let cube = unit_cube();
        let entries = [lifted_cube_entry(&cube)];
        let index = SceneIndex::build(&entries);

        let down = Ray::new(Point3::new(0.5, 0.5, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let hits = index.query(&down);
        assert!(!hits.is_empty());
        assert!((hits[0].point.z - 3.0).abs() < 1e-9);
        assert_eq!(hits[0].mesh, 0);

        let below_top = index.first_hit_beyond(&down, 2.5).unwrap();
        assert!((below_top.point.z - 2.0).abs() < 1e-9);
    }

    #[test]
    fn scene_index_tracks_staleness() {
        let cube = unit_cube();
        let entries = [lifted_cube_entry(&cube)];
        let index = SceneIndex::build(&entries);
        assert!(!index.is_stale(&entries));

        let moved = [SceneEntry {
            id: 0,
            mesh: &cube,
            transform: Transform3D::from_translation(Vector3::new(1.0, 0.0, 2.0)),
        }];
        assert!(index.is_stale(&moved));
    }

    #[test]
    fn scan_finds_touchpoints_under_floating_geometry() {
        let cube = unit_cube();
        let entries = [ScanMesh {
            id: 7,
            mesh: &cube,
            transform: Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0)),
        }];

        let touchpoints = find_touchpoints(&entries, &ScanConfig::default());
        assert!(!touchpoints.is_empty());
        assert!(touchpoints.iter().all(|tp| tp.mesh == 7));
        assert!(touchpoints.iter().all(|tp| !tp.is_routed()));
        assert!(touchpoints.iter().all(|tp| (tp.position.z - 2.0).abs() < 0.2));
    }

    #[test]
    fn scan_config_builder_chain() {
        let config = ScanConfig::default()
            .with_cell_size(0.2)
            .with_probe_cells(4)
            .with_min_spacing(0.5);
        assert!((config.cell_size() - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.probe_cells(), 4);
        assert!((config.min_spacing() - 0.5).abs() < f64::EPSILON);
    }
}

// =============================================================================
// TIER 3: Support Generation - Routing, Strut Construction
// =============================================================================

mod tier3_support_generation {
    use super::*;
    use uvforge::types::Point3;

    #[test]
    fn open_air_touchpoints_route_to_the_platform() {
        let cube = unit_cube();
        let scan_entries = [ScanMesh {
            id: 0,
            mesh: &cube,
            transform: Transform3D::from_translation(uvforge::types::Vector3::new(0.0, 0.0, 2.0)),
        }];
        let scan = scan_scene(&scan_entries, &ScanConfig::default());
        let mut touchpoints = scan.touchpoints;
        assert!(!touchpoints.is_empty());

        let index_entries = [uvforge::collide::SceneEntry {
            id: 0,
            mesh: &cube,
            transform: Transform3D::from_translation(uvforge::types::Vector3::new(0.0, 0.0, 2.0)),
        }];
        let index = SceneIndex::build(&index_entries);

        let routed = route_touchpoints(
            &mut touchpoints,
            &index,
            &scan.occupancy,
            &RouteConfig::default(),
        );
        assert_eq!(routed, touchpoints.len());
        for tp in &touchpoints {
            let path = tp.path.as_ref().unwrap();
            assert_eq!(path.anchor(), PathAnchor::Platform);
            assert!(path.end().unwrap().z.abs() < 1e-9);
        }
    }

    #[test]
    fn support_path_geometry_accessors() {
        let path = SupportPath::new(
            vec![
                Point3::new(0.0, 0.0, 3.0),
                Point3::new(0.5, 0.0, 1.5),
                Point3::new(0.5, 0.0, 0.0),
            ],
            PathAnchor::Platform,
        );
        assert_eq!(path.points().len(), 3);
        assert_eq!(path.start().unwrap().z, 3.0);
        assert_eq!(path.end().unwrap().z, 0.0);
        assert!(path.length() > 3.0);
        assert!((path.horizontal_offset() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn build_support_yields_a_printable_strut() {
        let path = SupportPath::new(
            vec![Point3::new(0.5, 0.5, 2.0), Point3::new(0.5, 0.5, 0.0)],
            PathAnchor::Platform,
        );
        let dims = SupportDims::from_millimetres(0.4, 0.6, 1.0, 3.0, 3.0);
        let strut = build_support(&path, Point3::new(0.5, 0.5, 2.0), &dims).unwrap();

        assert!(strut.face_count() > 100);
        let bounds = strut.bounds().unwrap();
        assert!(bounds.min.z < 1e-9);
        assert!(bounds.max.z >= 2.0);
    }

    #[test]
    fn route_config_builder_chain() {
        let config = RouteConfig::default()
            .with_max_retries(8)
            .with_max_ring(2)
            .with_clearance_cells(2);
        assert_eq!(config.max_retries(), 8);
        assert_eq!(config.max_ring(), 2);
        assert_eq!(config.clearance_cells(), 2);
    }
}

// =============================================================================
// TIER 4: Slicing Primitives - Profile, Raster, Script
// =============================================================================

mod tier4_slicing_primitives {
    use super::*;
    use uvforge::raster::{encode_png, section_at_height, RasterTarget};
    use uvforge::script::ScriptAssembler;

    #[test]
    fn printer_profile_serde_round_trip() {
        let profile = PrinterProfile::default();
        let json = serde_json::to_string(&profile).unwrap();
        let restored: PrinterProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, restored);
        assert!(restored.validate().is_ok());
    }

    #[test]
    fn profile_validation_rejects_bad_settings() {
        let mut profile = PrinterProfile::default();
        profile.print_settings.layer_height = 0.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn sections_rasterize_and_encode() {
        let mut cube = unit_cube();
        cube.scale_uniform(8.0);

        let segments = section_at_height(&cube, 4.0);
        assert!(!segments.is_empty());

        let target = RasterTarget::new(64, 64, 16.0, 16.0).unwrap();
        let image = target.rasterize(&segments);
        let lit = image.pixels().filter(|pixel| pixel.0[0] == 255).count();
        assert_eq!(lit, 1024);

        let png = encode_png(&image).unwrap();
        assert!(!png.is_empty());
    }

    #[test]
    fn script_assembly_substitutes_tokens() {
        let profile = PrinterProfile::default();
        let assembler = ScriptAssembler::new(&profile, 3);

        let header = assembler.header("part");
        assert!(header.starts_with(";fileName:part\n"));
        assert!(header.contains(";totalLayer:3\n"));

        let block = assembler.layer_block(0);
        assert!(block.contains("M6054 \"1.png\""));
        assert!(block.contains("M106 S255"));

        let script = assembler.build("part");
        assert!(script.contains(";START_GCODE_BEGIN"));
        assert!(script.contains(";END_GCODE_BEGIN"));
    }
}

// =============================================================================
// TIER 5: Orchestration - Registry, Storage, Engine Runs
// =============================================================================

mod tier5_orchestration {
    use super::*;
    use std::sync::Arc;
    use uvforge::engine::{RunSummary, SlicerState};
    use uvforge::profile::{PrintSettings, Resolution, Workspace};

    fn small_profile() -> PrinterProfile {
        PrinterProfile {
            resolution: Resolution { x: 16, y: 16 },
            workspace: Workspace {
                size_x: 160.0,
                size_y: 160.0,
                height: 160.0,
            },
            print_settings: PrintSettings {
                layer_height: 5.0,
                ..PrintSettings::default()
            },
            ..PrinterProfile::default()
        }
    }

    #[test]
    fn registry_slots_behave_like_an_arena() {
        let mut registry = MeshRegistry::new();
        let a = registry.insert(SceneMesh::new(unit_cube()));
        let b = registry.insert(SceneMesh::new(unit_cube()));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        registry.remove(a);
        let c = registry.insert(SceneMesh::new(unit_cube()));
        assert_eq!(c, a);
        assert!(registry.get(c).is_some());
    }

    #[test]
    fn memory_storage_holds_run_artifacts() {
        let storage = MemoryStorage::new();
        storage.prepare().unwrap();
        storage.write_image("1.png", &[0, 1]).unwrap();
        storage.write_text("part.gcode", ";fileName:part").unwrap();

        assert_eq!(storage.image_count(), 1);
        assert_eq!(storage.text("part.gcode").as_deref(), Some(";fileName:part"));
    }

    #[test]
    fn an_engine_run_returns_a_summary() {
        let storage = Arc::new(MemoryStorage::new());
        let mut engine =
            SliceEngine::new(small_profile(), storage.clone(), |_| {}).with_workers(2);

        let mut cube = unit_cube();
        cube.scale_uniform(5.0);
        engine.registry_mut().insert(SceneMesh::new(cube));

        let RunSummary {
            outcome,
            layer_count,
            output,
        } = engine.run("part").unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(layer_count, 10);
        assert_eq!(output, storage.root());
        assert_eq!(engine.state(), SlicerState::Idle);
    }
}
