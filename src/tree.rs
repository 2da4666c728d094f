//! Kinematic tree construction.
//!
//! Resolves joint references by name, checks the tree invariants and builds
//! the index-based adjacency a [`Robot`] answers queries from. The steps run
//! in a fixed order and the first failure is returned.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::error::{EntityKind, Result, UrdfError};
use crate::parser::RawRobot;
use crate::robot::{Edge, Robot};

/// Build a validated [`Robot`] from parsed links and joints.
///
/// Checks, in order:
/// - link names, then joint names, are unique
/// - every joint's parent and child name a link
/// - no link is the child of more than one joint
/// - following parent joints never loops
/// - exactly one link has no parent
/// - every link is reachable from that root
///
/// # Errors
///
/// Returns the first violated check as [`UrdfError::DuplicateName`],
/// [`UrdfError::UnresolvedReference`], [`UrdfError::MultipleParentsForLink`],
/// [`UrdfError::CyclicStructure`] or [`UrdfError::DisconnectedOrMultipleRoots`].
pub fn build_robot(raw: RawRobot) -> Result<Robot> {
    let RawRobot {
        name,
        links,
        joints,
        materials,
    } = raw;

    let link_index = index_names(links.iter().map(|l| l.name()), EntityKind::Link)?;
    let joint_index = index_names(joints.iter().map(|j| j.name()), EntityKind::Joint)?;

    debug!(robot = %name, "resolving references");
    let mut edges = Vec::with_capacity(joints.len());
    for joint in &joints {
        let parent = *link_index
            .get(joint.parent())
            .ok_or_else(|| UrdfError::unresolved(joint.name(), joint.parent()))?;
        let child = *link_index
            .get(joint.child())
            .ok_or_else(|| UrdfError::unresolved(joint.name(), joint.child()))?;
        edges.push((parent, child));
    }

    debug!(robot = %name, "validating connectivity");
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); links.len()];
    for (j, &(_, child)) in edges.iter().enumerate() {
        incoming[child].push(j);
    }
    if let Some((i, js)) = incoming.iter().enumerate().find(|(_, js)| js.len() > 1) {
        return Err(UrdfError::MultipleParentsForLink {
            link: links[i].name().to_string(),
            joints: js.iter().map(|&j| joints[j].name().to_string()).collect(),
        });
    }
    let parent_joint: Vec<Option<usize>> = incoming.iter().map(|js| js.first().copied()).collect();

    if let Some(cycle) = find_cycle(&parent_joint, &edges) {
        return Err(UrdfError::CyclicStructure {
            joints: cycle.iter().map(|&j| joints[j].name().to_string()).collect(),
        });
    }

    let roots: Vec<usize> = (0..links.len())
        .filter(|&i| parent_joint[i].is_none())
        .collect();
    let [root] = roots[..] else {
        return Err(UrdfError::DisconnectedOrMultipleRoots {
            links: roots.iter().map(|&i| links[i].name().to_string()).collect(),
        });
    };

    let mut children: Vec<Vec<Edge>> = vec![Vec::new(); links.len()];
    for (joint, &(parent, child)) in edges.iter().enumerate() {
        children[parent].push(Edge { joint, child });
    }

    let mut visited = vec![false; links.len()];
    let mut stack = vec![root];
    visited[root] = true;
    while let Some(i) = stack.pop() {
        for edge in &children[i] {
            if visited[edge.child] {
                return Err(UrdfError::CyclicStructure {
                    joints: vec![joints[edge.joint].name().to_string()],
                });
            }
            visited[edge.child] = true;
            stack.push(edge.child);
        }
    }
    let unreached: Vec<String> = visited
        .iter()
        .enumerate()
        .filter(|(_, seen)| !**seen)
        .map(|(i, _)| links[i].name().to_string())
        .collect();
    if !unreached.is_empty() {
        return Err(UrdfError::DisconnectedOrMultipleRoots { links: unreached });
    }

    debug!(
        robot = %name,
        root = links[root].name(),
        links = links.len(),
        joints = joints.len(),
        "built kinematic tree"
    );

    Ok(Robot::from_parts(
        name,
        links,
        joints,
        materials,
        link_index,
        joint_index,
        root,
        parent_joint,
        children,
    ))
}

fn index_names<'n>(
    names: impl Iterator<Item = &'n str>,
    kind: EntityKind,
) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::new();
    for (i, name) in names.enumerate() {
        match index.entry(name.to_string()) {
            Entry::Occupied(_) => {
                return Err(UrdfError::DuplicateName {
                    kind,
                    name: name.to_string(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(i);
            }
        }
    }
    Ok(index)
}

/// Walk parent pointers from every link and return the first loop found.
///
/// The loop is given as joint indices in parent-to-child order, starting
/// from the joint that appears first in the document.
fn find_cycle(parent_joint: &[Option<usize>], edges: &[(usize, usize)]) -> Option<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unseen,
        /// Index of the link within the current `path`.
        OnPath(usize),
        Done,
    }

    let mut marks = vec![Mark::Unseen; parent_joint.len()];
    for start in 0..parent_joint.len() {
        let mut path = Vec::new();
        let mut current = start;
        loop {
            match marks[current] {
                Mark::Done => break,
                Mark::OnPath(pos) => {
                    let mut cycle: Vec<usize> = path[pos..]
                        .iter()
                        .rev()
                        .filter_map(|&l| parent_joint[l])
                        .collect();
                    if let Some(first) = cycle.iter().enumerate().min_by_key(|(_, j)| **j) {
                        let first = first.0;
                        cycle.rotate_left(first);
                    }
                    return Some(cycle);
                }
                Mark::Unseen => {
                    marks[current] = Mark::OnPath(path.len());
                    path.push(current);
                    match parent_joint[current] {
                        Some(j) => current = edges[j].0,
                        None => break,
                    }
                }
            }
        }
        for l in path {
            marks[l] = Mark::Done;
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::elements::Limit;
    use crate::error::ErrorKind;
    use crate::joint::{Joint, JointType};
    use crate::link::Link;

    fn raw(links: &[&str], joints: &[(&str, &str, &str)]) -> RawRobot {
        RawRobot {
            name: "test".into(),
            links: links.iter().map(|n| Link::new(*n).unwrap()).collect(),
            joints: joints
                .iter()
                .map(|(n, p, c)| Joint::new(*n, JointType::Fixed, *p, *c).unwrap())
                .collect(),
            materials: Vec::new(),
        }
    }

    #[test]
    fn test_valid_chain() {
        let robot = build_robot(raw(
            &["base", "link1", "link2"],
            &[("j1", "base", "link1"), ("j2", "link1", "link2")],
        ))
        .unwrap();
        assert_eq!(robot.root_link().name(), "base");
        let order: Vec<_> = robot.depth_first().iter().map(|l| l.name()).collect();
        assert_eq!(order, ["base", "link1", "link2"]);
    }

    #[test]
    fn test_root_need_not_come_first() {
        let robot = build_robot(raw(&["tip", "base"], &[("j", "base", "tip")])).unwrap();
        assert_eq!(robot.root_link().name(), "base");
    }

    #[test]
    fn test_single_link() {
        let robot = build_robot(raw(&["only"], &[])).unwrap();
        assert_eq!(robot.link_count(), 1);
        assert_eq!(robot.joint_count(), 0);
        assert_eq!(robot.root_link().name(), "only");
    }

    #[test]
    fn test_duplicate_link() {
        let err = build_robot(raw(&["base", "base"], &[])).unwrap_err();
        assert_eq!(
            err,
            UrdfError::DuplicateName {
                kind: EntityKind::Link,
                name: "base".into(),
            }
        );
    }

    #[test]
    fn test_duplicate_joint() {
        let err = build_robot(raw(
            &["a", "b", "c"],
            &[("j", "a", "b"), ("j", "a", "c")],
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            UrdfError::DuplicateName {
                kind: EntityKind::Joint,
                ..
            }
        ));
    }

    #[test]
    fn test_undefined_link_reference() {
        let err = build_robot(raw(&["base"], &[("j1", "base", "nonexistent")])).unwrap_err();
        assert_eq!(err, UrdfError::unresolved("j1", "nonexistent"));

        let err = build_robot(raw(&["base"], &[("j1", "ghost", "base")])).unwrap_err();
        assert_eq!(err, UrdfError::unresolved("j1", "ghost"));
    }

    #[test]
    fn test_multiple_parents() {
        let err = build_robot(raw(
            &["a", "b", "c"],
            &[("j1", "a", "c"), ("j2", "b", "c")],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            UrdfError::MultipleParentsForLink {
                link: "c".into(),
                joints: vec!["j1".into(), "j2".into()],
            }
        );
    }

    #[test]
    fn test_two_link_cycle_with_spare_root() {
        let err = build_robot(raw(
            &["a", "b", "c"],
            &[("j1", "a", "b"), ("j2", "b", "a")],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            UrdfError::CyclicStructure {
                joints: vec!["j1".into(), "j2".into()],
            }
        );
    }

    #[test]
    fn test_cycle_below_root() {
        // base -> a -> b -> c -> a is impossible (a would have two parents),
        // so the loop is detached: base alone, plus a -> b -> c -> a.
        let err = build_robot(raw(
            &["base", "a", "b", "c"],
            &[("ab", "a", "b"), ("bc", "b", "c"), ("ca", "c", "a")],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            UrdfError::CyclicStructure {
                joints: vec!["ab".into(), "bc".into(), "ca".into()],
            }
        );
    }

    #[test]
    fn test_cycle_entered_from_a_tail() {
        // The scan starts at c, walks up into a, then loops a -> b -> a, so the
        // loop begins partway along the walked path.
        let err = build_robot(raw(
            &["c", "a", "b"],
            &[("tail", "a", "c"), ("ab", "a", "b"), ("ba", "b", "a")],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            UrdfError::CyclicStructure {
                joints: vec!["ab".into(), "ba".into()],
            }
        );
    }

    #[test]
    fn test_self_loop() {
        let err = build_robot(raw(&["a", "b"], &[("j", "a", "a")])).unwrap_err();
        assert_eq!(
            err,
            UrdfError::CyclicStructure {
                joints: vec!["j".into()],
            }
        );
    }

    #[test]
    fn test_multiple_roots() {
        let err = build_robot(raw(&["root1", "root2"], &[])).unwrap_err();
        assert_eq!(
            err,
            UrdfError::DisconnectedOrMultipleRoots {
                links: vec!["root1".into(), "root2".into()],
            }
        );
    }

    #[test]
    fn test_no_links() {
        let err = build_robot(raw(&[], &[])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisconnectedOrMultipleRoots);
    }

    #[test]
    fn test_failure_order_duplicate_before_unresolved() {
        let err = build_robot(raw(&["a", "a"], &[("j", "a", "missing")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
    }

    #[test]
    fn test_joint_data_survives() {
        let mut input = raw(&["a", "b"], &[]);
        input.joints.push(
            Joint::new("j", JointType::Revolute, "a", "b")
                .unwrap()
                .with_limit(Limit::new(Some(-1.0), Some(1.0), 2.0, 3.0).unwrap()),
        );
        let robot = build_robot(input).unwrap();
        let (joint, child) = robot.children_of("a").next().unwrap();
        assert_eq!(child, "b");
        assert_eq!(joint.limit().unwrap().velocity(), 3.0);
    }
}
