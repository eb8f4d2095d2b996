use std::path::Path;

use redpnr_core::Layout;
use redpnr_route::ExtractedRouting;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::json::write_json;

/// The final artifact: the stamped grid and the paths that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedOutput {
    /// Id of the placement snapshot the routing was stamped over.
    pub snapshot: Uuid,
    pub layout: Layout,
    pub routing: ExtractedRouting,
}

impl RoutedOutput {
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)?;
        log::info!("Saved routed layout {} to {}", self.layout.dimensions(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use redpnr_core::{Coord, Dimensions, PinRef};
    use redpnr_route::{ExtractedSegment, NetSegment, PathElement, SegmentEndpoint};

    use super::*;

    #[test]
    fn test_routed_output_round_trip() {
        let mut layout = Layout::new(Dimensions::new(2, 1, 3), 0);
        layout.blocks[(1, 0, 1)] = 55;
        let segment = NetSegment::new(
            SegmentEndpoint::new(PinRef::new("u1", "Y"), Coord::new(1, 0, 0)),
            SegmentEndpoint::new(PinRef::new("u2", "A"), Coord::new(1, 0, 2)),
            vec![Coord::new(1, 0, 1)],
        );
        let path = vec![
            PathElement::Wire(Coord::new(1, 0, 0)),
            PathElement::Wire(Coord::new(1, 0, 1)),
            PathElement::Wire(Coord::new(1, 0, 2)),
        ];
        let output = RoutedOutput {
            snapshot: Uuid::new_v4(),
            layout,
            routing: ExtractedRouting::from([("n1".to_string(), vec![ExtractedSegment { segment, path }])]),
        };

        let json = serde_json::to_string(&output).unwrap();
        let back: RoutedOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, output);
        assert_eq!(back.layout.block(Coord::new(1, 0, 1)), Some(55));
    }
}
