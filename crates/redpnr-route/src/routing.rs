use std::collections::BTreeMap;

use redpnr_core::{Coord, PinRef};
use serde::{Deserialize, Serialize};

use crate::element::PathElement;

/// One end of a routed segment: the pin and where it sits in the placed grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentEndpoint {
    #[serde(flatten)]
    pub pin: PinRef,
    pub pin_coord: Coord,
}

impl SegmentEndpoint {
    pub fn new(pin: PinRef, pin_coord: Coord) -> Self {
        Self { pin, pin_coord }
    }
}

/// A two-pin connection and the coarse path between its pins, pins excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSegment {
    pub pins: [SegmentEndpoint; 2],
    #[serde(default)]
    pub waypoints: Vec<Coord>,
}

impl NetSegment {
    pub fn new(start: SegmentEndpoint, stop: SegmentEndpoint, waypoints: Vec<Coord>) -> Self {
        Self {
            pins: [start, stop],
            waypoints,
        }
    }

    pub fn start(&self) -> &SegmentEndpoint {
        &self.pins[0]
    }

    pub fn stop(&self) -> &SegmentEndpoint {
        &self.pins[1]
    }
}

/// Net name → its segments.
pub type Routing = BTreeMap<String, Vec<NetSegment>>;

/// A segment with its legalized path, bracketed by wire elements on both pins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSegment {
    #[serde(flatten)]
    pub segment: NetSegment,
    pub path: Vec<PathElement>,
}

impl ExtractedSegment {
    pub fn repeater_count(&self) -> usize {
        self.path
            .iter()
            .filter(|e| matches!(e, PathElement::Repeater(_)))
            .count()
    }
}

pub type ExtractedRouting = BTreeMap<String, Vec<ExtractedSegment>>;
