use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::panels::PanelId;

/// Marker on the car's scene root entity.
#[derive(Component, Reflect)]
pub struct CarRoot;

/// Inserted when the car model failed to load; [`CarNodes`] will never appear.
#[derive(Resource, Debug, Default)]
pub struct CarUnavailable;

/// Clickable node: a press on it or any descendant acts on this panel.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub struct Hotspot(pub PanelId);

/// Local rotation of a hinged node as authored in the model.
///
/// Panel angles are applied on top of this.
#[derive(Component, Clone, Copy, Debug, Reflect)]
pub struct RestPose(pub Quat);

/// Fixed node identifiers the viewer looks up in the car model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CarNode {
    /// `LF_Door`
    LeftFrontDoor,
    /// `RF_Door`
    RightFrontDoor,
    /// `LR_Door`
    LeftRearDoor,
    /// `RR_Door`
    RightRearDoor,
    /// `Frunk`
    Frunk,
    /// `Trunk`, animated by morph weight.
    Trunk,
    /// `Front_Light` lamp mesh.
    FrontLight,
    /// `Rear_Light` lamp mesh.
    RearLight,
    /// `FL_Tire`
    FrontLeftTire,
    /// `FR_Tire`
    FrontRightTire,
    /// `RL_Tire`
    RearLeftTire,
    /// `RR_Tire`
    RearRightTire,
}

impl CarNode {
    /// Every identifier, in resolution order.
    pub const ALL: [CarNode; 12] = [
        CarNode::LeftFrontDoor,
        CarNode::RightFrontDoor,
        CarNode::LeftRearDoor,
        CarNode::RightRearDoor,
        CarNode::Frunk,
        CarNode::Trunk,
        CarNode::FrontLight,
        CarNode::RearLight,
        CarNode::FrontLeftTire,
        CarNode::FrontRightTire,
        CarNode::RearLeftTire,
        CarNode::RearRightTire,
    ];

    /// The four tires.
    pub const TIRES: [CarNode; 4] = [
        CarNode::FrontLeftTire,
        CarNode::FrontRightTire,
        CarNode::RearLeftTire,
        CarNode::RearRightTire,
    ];

    /// Node name in the model.
    pub fn name(self) -> &'static str {
        match self {
            CarNode::LeftFrontDoor => "LF_Door",
            CarNode::RightFrontDoor => "RF_Door",
            CarNode::LeftRearDoor => "LR_Door",
            CarNode::RightRearDoor => "RR_Door",
            CarNode::Frunk => "Frunk",
            CarNode::Trunk => "Trunk",
            CarNode::FrontLight => "Front_Light",
            CarNode::RearLight => "Rear_Light",
            CarNode::FrontLeftTire => "FL_Tire",
            CarNode::FrontRightTire => "FR_Tire",
            CarNode::RearLeftTire => "RL_Tire",
            CarNode::RearRightTire => "RR_Tire",
        }
    }

    /// Identifier for a node name, if it is one the viewer uses.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|node| node.name() == name)
    }

    /// Panel driven by this node, if it is openable.
    pub fn panel(self) -> Option<PanelId> {
        PanelId::ALL.into_iter().find(|panel| panel.node() == self)
    }
}

/// Identifier → entity map built once when the car scene is ready.
#[derive(Resource, Debug, Default)]
pub struct CarNodes {
    nodes: HashMap<CarNode, Entity>,
    /// Entity carrying the trunk's morph weights (the trunk node or a descendant).
    pub trunk_morph: Option<Entity>,
}

impl CarNodes {
    /// Builds the map from `(entity, name)` pairs. The first entity with a
    /// given name wins; later ones are returned as duplicates.
    pub fn resolve<'a>(named: impl IntoIterator<Item = (Entity, &'a str)>) -> (Self, Vec<CarNode>) {
        let mut nodes = HashMap::new();
        let mut duplicates = Vec::new();
        for (entity, name) in named {
            let Some(node) = CarNode::from_name(name) else {
                continue;
            };
            if nodes.contains_key(&node) {
                duplicates.push(node);
            } else {
                nodes.insert(node, entity);
            }
        }
        (
            Self {
                nodes,
                trunk_morph: None,
            },
            duplicates,
        )
    }

    /// Entity for `node`, or `None` if the model lacks it.
    pub fn get(&self, node: CarNode) -> Option<Entity> {
        self.nodes.get(&node).copied()
    }

    /// Identifiers absent from the model.
    pub fn missing(&self) -> Vec<CarNode> {
        CarNode::ALL
            .into_iter()
            .filter(|node| !self.nodes.contains_key(node))
            .collect()
    }

    /// Number of identifiers found.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when no identifier was found.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for node in CarNode::ALL {
            assert_eq!(CarNode::from_name(node.name()), Some(node));
        }
        assert_eq!(CarNode::from_name("Body"), None);
    }

    #[test]
    fn only_panels_map_to_panels() {
        let panels: Vec<_> = CarNode::ALL.into_iter().filter_map(CarNode::panel).collect();
        assert_eq!(panels, PanelId::ALL.to_vec());
        for tire in CarNode::TIRES {
            assert!(tire.panel().is_none());
        }
    }

    #[test]
    fn resolve_keeps_first_and_reports_duplicates() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let c = world.spawn_empty().id();

        let (nodes, dups) =
            CarNodes::resolve([(a, "LF_Door"), (b, "Body"), (c, "LF_Door")]);
        assert_eq!(nodes.get(CarNode::LeftFrontDoor), Some(a));
        assert_eq!(dups, vec![CarNode::LeftFrontDoor]);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn missing_nodes_are_absent_not_errors() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let (nodes, _) = CarNodes::resolve([(a, "Trunk")]);
        assert_eq!(nodes.get(CarNode::FrontLight), None);
        let missing = nodes.missing();
        assert_eq!(missing.len(), CarNode::ALL.len() - 1);
        assert!(!missing.contains(&CarNode::Trunk));
    }
}
