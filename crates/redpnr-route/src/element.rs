use std::fmt;

use redpnr_core::Coord;
use serde::{Deserialize, Serialize};

/// What a single step along a route turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementKind {
    Wire,
    Repeater,
    UpVia,
    DownVia,
}

impl ElementKind {
    pub fn is_via(self) -> bool {
        matches!(self, ElementKind::UpVia | ElementKind::DownVia)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Wire => "WIRE",
            ElementKind::Repeater => "REPEATER",
            ElementKind::UpVia => "UP_VIA",
            ElementKind::DownVia => "DOWN_VIA",
        };
        f.write_str(s)
    }
}

/// A tagged voxel of an extracted path. `Noop` separates unrelated segments
/// in a concatenated sequence and carries no coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "at", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathElement {
    Wire(Coord),
    Repeater(Coord),
    UpVia(Coord),
    DownVia(Coord),
    Noop,
}

impl PathElement {
    pub fn new(kind: ElementKind, at: Coord) -> Self {
        match kind {
            ElementKind::Wire => PathElement::Wire(at),
            ElementKind::Repeater => PathElement::Repeater(at),
            ElementKind::UpVia => PathElement::UpVia(at),
            ElementKind::DownVia => PathElement::DownVia(at),
        }
    }

    pub fn kind(&self) -> Option<ElementKind> {
        match self {
            PathElement::Wire(_) => Some(ElementKind::Wire),
            PathElement::Repeater(_) => Some(ElementKind::Repeater),
            PathElement::UpVia(_) => Some(ElementKind::UpVia),
            PathElement::DownVia(_) => Some(ElementKind::DownVia),
            PathElement::Noop => None,
        }
    }

    pub fn coord(&self) -> Option<Coord> {
        match *self {
            PathElement::Wire(c)
            | PathElement::Repeater(c)
            | PathElement::UpVia(c)
            | PathElement::DownVia(c) => Some(c),
            PathElement::Noop => None,
        }
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind(), self.coord()) {
            (Some(kind), Some(at)) => write!(f, "{kind}@{at}"),
            _ => f.write_str("NOOP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_element_json() {
        let e = PathElement::UpVia(Coord::new(1, 2, 3));
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, r#"{"kind":"UP_VIA","at":[1,2,3]}"#);
        assert_eq!(serde_json::from_str::<PathElement>(&json).unwrap(), e);
        assert_eq!(serde_json::to_string(&PathElement::Noop).unwrap(), r#"{"kind":"NOOP"}"#);
    }

    #[test]
    fn test_kind_and_coord() {
        let e = PathElement::new(ElementKind::Repeater, Coord::new(1, 0, 4));
        assert_eq!(e.kind(), Some(ElementKind::Repeater));
        assert_eq!(e.coord(), Some(Coord::new(1, 0, 4)));
        assert_eq!(e.to_string(), "REPEATER@(1, 0, 4)");
        assert_eq!(PathElement::Noop.kind(), None);
    }
}
