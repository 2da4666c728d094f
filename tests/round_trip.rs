//! Writing a robot back to URDF and reading it again.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use urdf_tree::{Geometry, parse_urdf_str, to_urdf_string};

const FULL: &str = r#"<?xml version="1.0"?>
<robot name="gripper_arm">
    <material name="aluminium">
        <color rgba="0.8 0.8 0.85 1"/>
    </material>
    <material name="decal">
        <texture filename="package://arm/decal.png"/>
    </material>

    <link name="base_link">
        <inertial>
            <origin xyz="0 0 0.05" rpy="0 0 0"/>
            <mass value="4.2"/>
            <inertia ixx="0.021" ixy="0.0001" ixz="0" iyy="0.021" iyz="0" izz="0.03"/>
        </inertial>
        <visual name="base_shell">
            <origin xyz="0 0 0.05"/>
            <geometry><cylinder radius="0.12" length="0.1"/></geometry>
            <material name="aluminium"/>
        </visual>
        <collision>
            <geometry><cylinder radius="0.12" length="0.1"/></geometry>
        </collision>
    </link>

    <link name="upper_arm">
        <inertial>
            <mass value="1.3"/>
            <inertia ixx="0.01" ixy="0" ixz="0" iyy="0.01" iyz="0" izz="0.002"/>
        </inertial>
        <visual>
            <geometry><mesh filename="package://arm/upper.stl" scale="0.001 0.001 0.001"/></geometry>
            <material name="anodized_red"><color rgba="0.7 0.1 0.1 1"/></material>
        </visual>
    </link>

    <link name="finger_left"/>
    <link name="finger_right"/>

    <joint name="shoulder" type="revolute">
        <parent link="base_link"/>
        <child link="upper_arm"/>
        <origin xyz="0 0 0.1" rpy="0 1.5707963267948966 0"/>
        <axis xyz="0 1 0"/>
        <calibration rising="0.25"/>
        <dynamics damping="0.7"/>
        <limit lower="-2.0944" upper="2.0944" effort="40" velocity="1.5"/>
        <safety_controller soft_lower_limit="-2" soft_upper_limit="2" k_position="15" k_velocity="10"/>
    </joint>

    <joint name="finger_left_joint" type="prismatic">
        <parent link="upper_arm"/>
        <child link="finger_left"/>
        <origin xyz="0.3 0.02 0"/>
        <axis xyz="0 1 0"/>
        <limit lower="0" upper="0.04" effort="20" velocity="0.1"/>
    </joint>

    <joint name="finger_right_joint" type="prismatic">
        <parent link="upper_arm"/>
        <child link="finger_right"/>
        <origin xyz="0.3 -0.02 0"/>
        <axis xyz="0 -1 0"/>
        <limit lower="0" upper="0.04" effort="20" velocity="0.1"/>
        <mimic joint="finger_left_joint" multiplier="1" offset="0"/>
    </joint>
</robot>
"#;

#[test]
fn full_document_round_trips() {
    let robot = parse_urdf_str(FULL).unwrap();
    let xml = to_urdf_string(&robot);
    let reparsed = parse_urdf_str(&xml).unwrap();
    assert_eq!(reparsed, robot);

    // And the output is a fixed point.
    assert_eq!(to_urdf_string(&reparsed), xml);
}

#[test]
fn round_trip_keeps_catalog_and_order() {
    let robot = parse_urdf_str(FULL).unwrap();
    let reparsed = parse_urdf_str(&to_urdf_string(&robot)).unwrap();

    let names: Vec<_> = reparsed.materials().iter().map(|m| m.name()).collect();
    assert_eq!(names, ["aluminium", "decal", "anodized_red"]);

    let joints: Vec<_> = reparsed.joints().iter().map(|j| j.name()).collect();
    assert_eq!(
        joints,
        ["shoulder", "finger_left_joint", "finger_right_joint"]
    );
    let children: Vec<_> = reparsed.children_of("upper_arm").map(|(_, c)| c).collect();
    assert_eq!(children, ["finger_left", "finger_right"]);
}

#[test]
fn round_trip_preserves_optional_presence() {
    let robot = parse_urdf_str(FULL).unwrap();
    let reparsed = parse_urdf_str(&to_urdf_string(&robot)).unwrap();

    let shoulder = reparsed.joint("shoulder").unwrap();
    let calibration = shoulder.calibration().unwrap();
    assert_eq!(calibration.rising(), Some(0.25));
    assert_eq!(calibration.falling(), None);
    assert_eq!(shoulder.dynamics().unwrap().friction(), None);

    let finger = reparsed.joint("finger_left_joint").unwrap();
    assert!(finger.calibration().is_none());
    assert!(finger.mimic().is_none());
    assert_eq!(
        reparsed.joint("finger_right_joint").unwrap().mimic().unwrap().joint(),
        "finger_left_joint"
    );

    match reparsed.link("upper_arm").unwrap().visuals()[0].geometry() {
        Geometry::Mesh { scale, .. } => assert!(scale.is_some()),
        other => panic!("expected mesh, got {other:?}"),
    }
    assert!(reparsed.link("base_link").unwrap().collisions()[0].name().is_none());
}
