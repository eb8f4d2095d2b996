use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::geometry::Rotation;
use crate::library::RotatedCells;

/// Unique instance identifier.
pub type InstanceId = String;

/// One placed copy of a cell type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellInstance {
    pub id: InstanceId,
    pub cell_type: String,
}

impl CellInstance {
    pub fn new(id: &str, cell_type: &str) -> Self {
        Self {
            id: id.to_string(),
            cell_type: cell_type.to_string(),
        }
    }
}

/// A reference to one port of one instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PinRef {
    pub instance: InstanceId,
    pub port: String,
}

impl PinRef {
    pub fn new(instance: &str, port: &str) -> Self {
        Self {
            instance: instance.to_string(),
            port: port.to_string(),
        }
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.instance, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    pub name: String,
    pub pins: Vec<PinRef>,
}

impl Net {
    pub fn new(name: &str, pins: Vec<PinRef>) -> Self {
        Self {
            name: name.to_string(),
            pins,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Netlist {
    pub instances: Vec<CellInstance>,
    pub nets: Vec<Net>,
}

impl Netlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_instance(&mut self, instance: CellInstance) {
        self.instances.push(instance);
    }

    pub fn add_net(&mut self, net: Net) {
        self.nets.push(net);
    }

    pub fn instance(&self, id: &str) -> Option<&CellInstance> {
        self.instances.iter().find(|i| i.id == id)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Check that ids are unique and every cell type and port exists.
    pub fn validate(&self, cells: &RotatedCells) -> Result<()> {
        let mut seen = BTreeSet::new();
        for instance in &self.instances {
            if !seen.insert(instance.id.as_str()) {
                return Err(CoreError::DuplicateInstance(instance.id.clone()));
            }
            if !cells.contains(&instance.cell_type) {
                return Err(CoreError::UnknownCellType(instance.cell_type.clone()));
            }
        }

        for pin in self.nets.iter().flat_map(|n| n.pins.iter()) {
            let instance = self
                .instance(&pin.instance)
                .ok_or_else(|| CoreError::UnknownInstance(pin.instance.clone()))?;
            let cell = cells.require(&instance.cell_type, Rotation::IDENTITY)?;
            if cell.port(&pin.port).is_none() {
                return Err(CoreError::UnknownPort {
                    cell_type: instance.cell_type.clone(),
                    port: pin.port.clone(),
                });
            }
        }
        Ok(())
    }
}
