//! Animation and skinning tests
//!
//! Tests for:
//! - Keyframe lookup, clamping and STEP/LINEAR sampling
//! - Channels with no keyframe pair around the query time
//! - Rotation slerp stays normalized
//! - Clip evaluation over a node hierarchy (end-to-end chain)
//! - Unsupported interpolation and invalid clip indices
//! - Joint matrices for skinned meshes

mod common;

use glam::{Mat4, Quat, Vec3, Vec4};
use scene_runtime::animation::{AnimationSampler, InterpolationMode, TargetPath};
use scene_runtime::assets::document::{
    AnimationChannelRecord, AnimationRecord, AnimationSamplerRecord, NodeRecord, SkinRecord,
};
use scene_runtime::errors::Error;
use scene_runtime::scene::{ModelTransforms, NodeGraph};
use std::f32::consts::FRAC_PI_2;

use common::chain_nodes;

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn translation_of(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

fn vec3_keys(values: &[Vec3]) -> Vec<Vec4> {
    values.iter().map(|v| v.extend(0.0)).collect()
}

fn sampler(inputs: Vec<f32>, values: &[Vec3], interpolation: InterpolationMode) -> AnimationSampler {
    AnimationSampler::new(inputs, vec3_keys(values), interpolation)
}

fn translation_clip(
    target_node: usize,
    inputs: Vec<f32>,
    values: &[Vec3],
    interpolation: InterpolationMode,
) -> AnimationRecord {
    AnimationRecord {
        name: Some("move".to_string()),
        samplers: vec![AnimationSamplerRecord {
            inputs,
            outputs: vec3_keys(values),
            interpolation,
        }],
        channels: vec![AnimationChannelRecord {
            sampler: 0,
            target_node: Some(target_node),
            path: TargetPath::Translation,
        }],
    }
}

// ============================================================================
// Sampler
// ============================================================================

#[test]
fn linear_midpoint() {
    let s = sampler(
        vec![0.0, 1.0],
        &[Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)],
        InterpolationMode::Linear,
    );
    assert!(vec3_approx(
        s.sample_vec3(0.5).unwrap().unwrap(),
        Vec3::new(0.0, 1.0, 0.0)
    ));
}

#[test]
fn step_holds_previous_key() {
    let s = sampler(
        vec![0.0, 1.0, 2.0],
        &[Vec3::X, Vec3::Y, Vec3::Z],
        InterpolationMode::Step,
    );
    assert_eq!(s.sample_vec3(0.99).unwrap(), Some(Vec3::X));
    assert_eq!(s.sample_vec3(1.5).unwrap(), Some(Vec3::Y));
    // An exact interior key time belongs to the pair ending at it.
    assert_eq!(s.sample_vec3(1.0).unwrap(), Some(Vec3::X));
    assert_eq!(s.sample_vec3(2.0).unwrap(), Some(Vec3::Y));
}

#[test]
fn linear_at_exact_key_reaches_that_key() {
    let s = sampler(
        vec![0.0, 1.0, 2.0],
        &[Vec3::X, Vec3::Y, Vec3::Z],
        InterpolationMode::Linear,
    );
    assert!(vec3_approx(s.sample_vec3(1.0).unwrap().unwrap(), Vec3::Y));
}

#[test]
fn times_outside_keys_produce_no_value() {
    let s = sampler(vec![1.0, 2.0], &[Vec3::X, Vec3::Y], InterpolationMode::Linear);
    assert_eq!(s.sample_vec3(-5.0).unwrap(), None);
    assert_eq!(s.sample_vec3(10.0).unwrap(), None);
}

#[test]
fn nan_time_produces_no_value() {
    let s = sampler(
        vec![0.0, 1.0, 2.0],
        &[Vec3::X, Vec3::Y, Vec3::Z],
        InterpolationMode::Step,
    );
    assert_eq!(s.sample_vec3(f32::NAN).unwrap(), None);
    assert_eq!(s.sample_quat(f32::NAN).unwrap(), None);
}

#[test]
fn span_lookup_uses_surrounding_keys() {
    let s = sampler(
        vec![0.0, 1.0, 3.0],
        &[Vec3::ZERO, Vec3::ONE, Vec3::ONE],
        InterpolationMode::Linear,
    );
    let span = s.locate(2.0).unwrap().unwrap();
    assert_eq!((span.index, span.next), (1, 2));
    assert!(approx_eq(span.factor, 0.5));
}

#[test]
fn rotation_slerp_is_normalized() {
    let a = Quat::IDENTITY;
    let b = Quat::from_rotation_y(FRAC_PI_2);
    let s = AnimationSampler::new(
        vec![0.0, 1.0],
        vec![Vec4::from(a), Vec4::from(b)],
        InterpolationMode::Linear,
    );

    for i in 0..=10 {
        let q = s.sample_quat(i as f32 / 10.0).unwrap().unwrap();
        assert!(approx_eq(q.length(), 1.0));
    }
    let mid = s.sample_quat(0.5).unwrap().unwrap();
    assert!(mid.abs_diff_eq(a.slerp(b, 0.5), EPSILON));
}

#[test]
fn cubic_spline_is_unsupported() {
    let s = sampler(vec![0.0, 1.0], &[Vec3::ZERO; 6], InterpolationMode::CubicSpline);
    assert!(matches!(s.sample_vec3(0.5), Err(Error::UnsupportedFeature(_))));
}

#[test]
fn sampler_without_enough_outputs_is_not_evaluable() {
    let s = sampler(vec![0.0, 1.0, 2.0], &[Vec3::ZERO], InterpolationMode::Linear);
    assert!(!s.is_evaluable());
    assert!(!sampler(vec![], &[], InterpolationMode::Linear).is_evaluable());
}

// ============================================================================
// Clip Evaluation
// ============================================================================

fn animated_chain() -> NodeGraph {
    let mut graph = NodeGraph::from_records(&chain_nodes(), &[0]).unwrap();
    graph
        .add_animation(
            0,
            translation_clip(
                2,
                vec![0.0, 1.0],
                &[Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)],
                InterpolationMode::Linear,
            ),
        )
        .unwrap();
    graph
}

#[test]
fn end_to_end_chain_with_identity_root() {
    let graph = animated_chain();
    let mut transforms = ModelTransforms::new();

    graph.compute_transforms(&mut transforms, &Mat4::IDENTITY, Some(0), 0.5);

    // (1,0,0) + (1,0,0) + animated (0,1,0)
    assert!(vec3_approx(
        translation_of(&transforms.node_global_matrices[2]),
        Vec3::new(2.0, 1.0, 0.0)
    ));
}

#[test]
fn end_to_end_chain_with_translated_root() {
    let graph = animated_chain();
    let mut transforms = ModelTransforms::new();

    graph.compute_transforms(
        &mut transforms,
        &Mat4::from_translation(Vec3::X),
        Some(0),
        0.5,
    );

    assert!(vec3_approx(
        translation_of(&transforms.node_global_matrices[2]),
        Vec3::new(3.0, 1.0, 0.0)
    ));
}

#[test]
fn clip_time_is_clamped() {
    let graph = animated_chain();
    let clip = &graph.animations()[0];
    assert!(approx_eq(clip.start(), 0.0));
    assert!(approx_eq(clip.end(), 1.0));

    let mut transforms = ModelTransforms::new();
    graph.compute_transforms(&mut transforms, &Mat4::IDENTITY, Some(0), 25.0);
    assert!(vec3_approx(
        translation_of(&transforms.node_global_matrices[2]),
        Vec3::new(2.0, 2.0, 0.0)
    ));

    graph.compute_transforms(&mut transforms, &Mat4::IDENTITY, Some(0), -3.0);
    assert!(vec3_approx(
        translation_of(&transforms.node_global_matrices[2]),
        Vec3::new(2.0, 0.0, 0.0)
    ));
}

#[test]
fn unanimated_nodes_keep_static_pose() {
    let graph = animated_chain();
    let mut transforms = ModelTransforms::new();
    graph.compute_transforms(&mut transforms, &Mat4::IDENTITY, Some(0), 0.5);

    assert_eq!(transforms.node_animations[0].translation, Vec3::X);
    assert_eq!(transforms.node_animations[1].translation, Vec3::X);
}

#[test]
fn channel_outside_its_sampler_range_keeps_static_pose() {
    // Translation keys cover [0, 1], scale keys cover [0, 2].
    let records = vec![NodeRecord {
        translation: Vec3::splat(7.0),
        ..Default::default()
    }];
    let mut graph = NodeGraph::from_records(&records, &[0]).unwrap();
    graph
        .add_animation(
            0,
            AnimationRecord {
                name: Some("partial".to_string()),
                samplers: vec![
                    AnimationSamplerRecord {
                        inputs: vec![0.0, 1.0],
                        outputs: vec3_keys(&[Vec3::ZERO, Vec3::X]),
                        interpolation: InterpolationMode::Linear,
                    },
                    AnimationSamplerRecord {
                        inputs: vec![0.0, 2.0],
                        outputs: vec3_keys(&[Vec3::ONE, Vec3::splat(3.0)]),
                        interpolation: InterpolationMode::Linear,
                    },
                ],
                channels: vec![
                    AnimationChannelRecord {
                        sampler: 0,
                        target_node: Some(0),
                        path: TargetPath::Translation,
                    },
                    AnimationChannelRecord {
                        sampler: 1,
                        target_node: Some(0),
                        path: TargetPath::Scale,
                    },
                ],
            },
        )
        .unwrap();

    let mut transforms = ModelTransforms::new();
    graph.compute_transforms(&mut transforms, &Mat4::IDENTITY, Some(0), 1.5);

    let pose = &transforms.node_animations[0];
    assert_eq!(pose.translation, Vec3::splat(7.0));
    assert!(vec3_approx(pose.scale, Vec3::splat(2.5)));
}

#[test]
fn nan_time_keeps_static_pose() {
    let graph = animated_chain();
    let mut transforms = ModelTransforms::new();
    graph.compute_transforms(&mut transforms, &Mat4::IDENTITY, Some(0), f32::NAN);

    assert_eq!(transforms.node_animations[2].translation, Vec3::X);
    assert!(vec3_approx(
        translation_of(&transforms.node_global_matrices[2]),
        Vec3::new(3.0, 0.0, 0.0)
    ));
}

#[test]
fn invalid_animation_index_falls_back_to_static_pose() {
    common::init_logger();
    let graph = animated_chain();
    let mut transforms = ModelTransforms::new();

    graph.compute_transforms(&mut transforms, &Mat4::IDENTITY, Some(9), 0.5);

    assert!(vec3_approx(
        translation_of(&transforms.node_global_matrices[2]),
        Vec3::new(3.0, 0.0, 0.0)
    ));
}

#[test]
fn cubic_spline_channel_is_skipped() {
    common::init_logger();
    let mut graph = NodeGraph::from_records(&chain_nodes(), &[0]).unwrap();
    graph
        .add_animation(
            0,
            translation_clip(
                2,
                vec![0.0, 1.0],
                &[Vec3::ZERO, Vec3::Y, Vec3::ZERO, Vec3::ZERO, Vec3::Y, Vec3::ZERO],
                InterpolationMode::CubicSpline,
            ),
        )
        .unwrap();

    let mut transforms = ModelTransforms::new();
    graph.compute_transforms(&mut transforms, &Mat4::IDENTITY, Some(0), 0.5);
    assert_eq!(transforms.node_animations[2].translation, Vec3::X);
}

#[test]
fn channel_with_bad_sampler_is_rejected() {
    let mut graph = NodeGraph::from_records(&chain_nodes(), &[0]).unwrap();
    let mut record = translation_clip(0, vec![0.0], &[Vec3::ZERO], InterpolationMode::Linear);
    record.channels[0].sampler = 4;
    assert!(matches!(
        graph.add_animation(0, record),
        Err(Error::IndexOutOfBounds { index: 4, .. })
    ));
}

#[test]
fn channel_outside_scene_is_dropped() {
    let mut graph = NodeGraph::from_records(&chain_nodes(), &[0]).unwrap();
    graph
        .add_animation(
            0,
            translation_clip(42, vec![0.0], &[Vec3::ZERO], InterpolationMode::Linear),
        )
        .unwrap();
    assert!(graph.animations()[0].channels.is_empty());
}

// ============================================================================
// Skinning
// ============================================================================

/// Node 0: skinned mesh. Node 1: joint root, node 2: child joint.
fn skinned_graph(inverse_bind_matrices: Option<Vec<Mat4>>) -> NodeGraph {
    let records = vec![
        NodeRecord {
            mesh: Some(0),
            skin: Some(0),
            ..Default::default()
        },
        NodeRecord {
            translation: Vec3::new(0.0, 1.0, 0.0),
            children: vec![2],
            ..Default::default()
        },
        NodeRecord {
            translation: Vec3::new(0.0, 1.0, 0.0),
            ..Default::default()
        },
    ];
    let mut graph = NodeGraph::from_records(&records, &[0, 1]).unwrap();
    graph
        .set_meshes(vec![scene_runtime::resources::Mesh::default()])
        .unwrap();
    graph
        .set_skins(&[SkinRecord {
            name: None,
            joints: vec![1, 2],
            inverse_bind_matrices,
            skeleton: Some(1),
        }])
        .unwrap();
    graph
        .add_animation(
            0,
            translation_clip(
                2,
                vec![0.0, 1.0],
                &[Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 3.0, 0.0)],
                InterpolationMode::Linear,
            ),
        )
        .unwrap();
    graph
}

#[test]
fn bind_pose_skinning_is_identity() {
    // Inverse bind matrices equal to the joints' rest globals.
    let ibms = vec![
        Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)),
        Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0)),
    ];
    let graph = skinned_graph(Some(ibms));
    assert_eq!(graph.skin_instance_count(), 1);
    assert_eq!(graph.nodes()[0].skin_instance, Some(0));

    let mut transforms = ModelTransforms::new();
    graph.compute_transforms(&mut transforms, &Mat4::IDENTITY, Some(0), 0.0);

    assert_eq!(transforms.skins.len(), 1);
    for joint in &transforms.skins[0].joint_matrices {
        assert!(joint.abs_diff_eq(Mat4::IDENTITY, EPSILON));
    }
}

#[test]
fn joint_matrix_follows_animated_joint() {
    let ibms = vec![
        Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)),
        Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0)),
    ];
    let graph = skinned_graph(Some(ibms));
    let mut transforms = ModelTransforms::new();
    graph.compute_transforms(&mut transforms, &Mat4::IDENTITY, Some(0), 1.0);

    // The child joint moved from local y=1 to y=3.
    let joint = transforms.skins[0].joint_matrices[1];
    assert!(vec3_approx(translation_of(&joint), Vec3::new(0.0, 2.0, 0.0)));
}

#[test]
fn joint_matrices_are_relative_to_the_mesh_node() {
    let graph = skinned_graph(None);
    let mut transforms = ModelTransforms::new();
    let root = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
    graph.compute_transforms(&mut transforms, &root, Some(0), 0.0);

    // The root transform cancels out: inv(mesh) * joint.
    let joint = transforms.skins[0].joint_matrices[0];
    assert!(vec3_approx(translation_of(&joint), Vec3::new(0.0, 1.0, 0.0)));
}

#[test]
fn static_pose_produces_no_skins() {
    let graph = skinned_graph(None);
    let mut transforms = ModelTransforms::new();
    graph.compute_transforms(&mut transforms, &Mat4::IDENTITY, None, 0.0);
    assert!(transforms.skins.is_empty());
}

#[test]
fn skin_with_mismatched_matrices_is_rejected() {
    let records = vec![NodeRecord::default(), NodeRecord::default()];
    let mut graph = NodeGraph::from_records(&records, &[0, 1]).unwrap();
    let err = graph
        .set_skins(&[SkinRecord {
            name: None,
            joints: vec![0, 1],
            inverse_bind_matrices: Some(vec![Mat4::IDENTITY]),
            skeleton: None,
        }])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::SkinJointMismatch {
            joints: 2,
            matrices: 1,
            ..
        }
    ));
}

#[test]
fn skin_joint_outside_scene_is_rejected() {
    let records = vec![NodeRecord::default(), NodeRecord::default()];
    let mut graph = NodeGraph::from_records(&records, &[0]).unwrap();
    let err = graph
        .set_skins(&[SkinRecord {
            joints: vec![1],
            ..Default::default()
        }])
        .unwrap_err();
    assert!(matches!(err, Error::IndexOutOfBounds { index: 1, .. }));
}
