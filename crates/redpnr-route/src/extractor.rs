use std::collections::HashSet;

use redpnr_core::{BlockRegistry, Layout};

use crate::classify::transitions;
use crate::config::ExtractorConfig;
use crate::element::PathElement;
use crate::error::Result;
use crate::routing::{ExtractedRouting, ExtractedSegment, NetSegment, Routing};
use crate::split::split_segment;
use crate::stamp::Stamper;

/// Legalizes routed nets and stamps them into a placed grid.
pub struct RouteExtractor<'a> {
    registry: &'a BlockRegistry,
    config: ExtractorConfig,
}

impl<'a> RouteExtractor<'a> {
    pub fn new(registry: &'a BlockRegistry, config: ExtractorConfig) -> Self {
        Self { registry, config }
    }

    /// The legalized interior of one segment, pins excluded.
    pub fn extract_net_segment(&self, segment: &NetSegment) -> Result<Vec<PathElement>> {
        let start = segment.start().pin_coord;
        let stop = segment.stop().pin_coord;
        let kinds = transitions(start, &segment.waypoints, stop)?;
        split_segment(&kinds, &segment.waypoints, start, stop, &self.config)
    }

    /// Extract every segment of every net. Each path is bracketed by wire
    /// elements on the two pin coordinates.
    pub fn extract_routing(&self, routing: &Routing) -> Result<ExtractedRouting> {
        let mut extracted = ExtractedRouting::new();
        for (net, segments) in routing {
            let mut out = Vec::with_capacity(segments.len());
            for segment in segments {
                let interior = self.extract_net_segment(segment)?;
                let mut path = Vec::with_capacity(interior.len() + 2);
                path.push(PathElement::Wire(segment.start().pin_coord));
                path.extend(interior);
                path.push(PathElement::Wire(segment.stop().pin_coord));

                let extracted = ExtractedSegment {
                    segment: segment.clone(),
                    path,
                };
                log::debug!(
                    "Net {}: {} -> {}, {} elements, {} repeaters",
                    net,
                    segment.start().pin,
                    segment.stop().pin,
                    extracted.path.len(),
                    extracted.repeater_count()
                );
                out.push(extracted);
            }
            extracted.insert(net.clone(), out);
        }
        log::info!("Extracted {} nets", extracted.len());
        Ok(extracted)
    }

    /// Stamp all extracted nets, in name order, into a copy of `placed_layout`.
    pub fn extract_layout(&self, extracted: &ExtractedRouting, placed_layout: &Layout) -> Result<Layout> {
        let mut sequence = Vec::new();
        let mut pins = HashSet::new();
        for (net, segments) in extracted {
            for segment in segments {
                sequence.extend(segment.path.iter().map(|&e| (net.as_str(), e)));
                sequence.push((net.as_str(), PathElement::Noop));
                pins.extend(segment.segment.pins.iter().map(|p| p.pin_coord));
            }
        }

        let mut stamper = Stamper::new(self.registry, self.config.floor_layer, placed_layout.clone(), pins);
        stamper.stamp(&sequence)?;
        log::info!(
            "Stamped {} path elements ({} tracked voxels)",
            sequence.len(),
            stamper.written()
        );
        Ok(stamper.into_layout())
    }
}

#[cfg(test)]
mod tests {
    use redpnr_core::{Coord, CoreError, Dimensions, Facing, PinRef};

    use super::*;
    use crate::error::RouteError;
    use crate::routing::SegmentEndpoint;

    fn endpoint(instance: &str, port: &str, at: Coord) -> SegmentEndpoint {
        SegmentEndpoint::new(PinRef::new(instance, port), at)
    }

    fn segment(start: Coord, waypoints: Vec<Coord>, stop: Coord) -> NetSegment {
        NetSegment::new(endpoint("u1", "Y", start), endpoint("u2", "A", stop), waypoints)
    }

    /// A grid with the two pin voxels already present as cell blocks.
    fn placed(dimensions: Dimensions, pins: &[Coord]) -> Layout {
        let mut layout = Layout::new(dimensions, 0);
        for pin in pins {
            layout.blocks[dimensions.index(pin).unwrap()] = 1;
        }
        layout
    }

    fn interior(path: &[PathElement]) -> &[PathElement] {
        &path[1..path.len() - 1]
    }

    #[test]
    fn test_straight_net_end_to_end() {
        let registry = BlockRegistry::default();
        let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
        let start = Coord::new(1, 0, 0);
        let stop = Coord::new(1, 0, 6);
        let waypoints: Vec<Coord> = (1..=5).map(|c| Coord::new(1, 0, c)).collect();
        let routing = Routing::from([("n1".to_string(), vec![segment(start, waypoints, stop)])]);

        let extracted = extractor.extract_routing(&routing).unwrap();
        let seg = &extracted["n1"][0];
        assert_eq!(seg.path.first(), Some(&PathElement::Wire(start)));
        assert_eq!(seg.path.last(), Some(&PathElement::Wire(stop)));
        assert_eq!(interior(&seg.path).len(), 5);
        assert!(interior(&seg.path).iter().all(|e| matches!(e, PathElement::Wire(_))));
        assert_eq!(seg.repeater_count(), 0);

        let dims = Dimensions::new(2, 1, 7);
        let layout = extractor.extract_layout(&extracted, &placed(dims, &[start, stop])).unwrap();
        assert_eq!(layout.count(registry.redstone_wire), 5);
        // supports land on the floor layer
        assert_eq!(layout.count(registry.stone), 2 + 5);
        // pins untouched, and nothing under them
        assert_eq!(layout.block(start), Some(1));
        assert_eq!(layout.block(Coord::new(0, 0, 0)), Some(registry.air));
    }

    #[test]
    fn test_long_net_gets_one_repeater() {
        let registry = BlockRegistry::default();
        let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
        let start = Coord::new(2, 0, 0);
        let stop = Coord::new(2, 0, 21);
        let waypoints: Vec<Coord> = (1..=20).map(|c| Coord::new(2, 0, c)).collect();
        let routing = Routing::from([("n".to_string(), vec![segment(start, waypoints, stop)])]);

        let extracted = extractor.extract_routing(&routing).unwrap();
        let seg = &extracted["n"][0];
        assert_eq!(seg.repeater_count(), 1);
        assert_eq!(interior(&seg.path)[12], PathElement::Repeater(Coord::new(2, 0, 13)));

        let layout = extractor
            .extract_layout(&extracted, &placed(Dimensions::new(3, 1, 22), &[start, stop]))
            .unwrap();
        assert_eq!(layout.block(Coord::new(2, 0, 13)), Some(registry.unpowered_repeater));
        assert_eq!(layout.data_at(Coord::new(2, 0, 13)), Some(registry.repeater_data(Facing::East)));
        // supports on layer 1 are above the floor
        assert_eq!(layout.count(registry.planks), 20);
    }

    #[test]
    fn test_up_via_with_repeater_before_it() {
        let registry = BlockRegistry::default();
        let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
        let start = Coord::new(1, 0, 0);
        let stop = Coord::new(4, 0, 5);
        let waypoints = vec![
            Coord::new(1, 0, 1),
            Coord::new(1, 0, 2),
            Coord::new(1, 0, 3),
            Coord::new(4, 0, 3),
            Coord::new(4, 0, 4),
        ];
        let routing = Routing::from([("n".to_string(), vec![segment(start, waypoints, stop)])]);
        let extracted = extractor.extract_routing(&routing).unwrap();
        let path = interior(&extracted["n"][0].path).to_vec();
        assert_eq!(
            path,
            vec![
                PathElement::Wire(Coord::new(1, 0, 1)),
                PathElement::Wire(Coord::new(1, 0, 2)),
                PathElement::UpVia(Coord::new(1, 0, 3)),
                PathElement::Wire(Coord::new(4, 0, 4)),
            ]
        );

        let layout = extractor
            .extract_layout(&extracted, &placed(Dimensions::new(5, 1, 6), &[start, stop]))
            .unwrap();
        // the wire entering the via becomes a repeater facing it
        assert_eq!(layout.block(Coord::new(1, 0, 2)), Some(registry.unpowered_repeater));
        assert_eq!(layout.data_at(Coord::new(1, 0, 2)), Some(registry.repeater_data(Facing::East)));
        assert_eq!(layout.block(Coord::new(1, 0, 1)), Some(registry.redstone_wire));
        // via column
        assert_eq!(layout.block(Coord::new(0, 0, 3)), Some(registry.stone));
        assert_eq!(layout.block(Coord::new(1, 0, 3)), Some(registry.stone));
        assert_eq!(layout.voxel(Coord::new(2, 0, 3)), Some((registry.redstone_torch, registry.torch_up)));
        assert_eq!(layout.block(Coord::new(3, 0, 3)), Some(registry.planks));
        assert_eq!(
            layout.voxel(Coord::new(4, 0, 3)),
            Some((registry.unlit_redstone_torch, registry.torch_up))
        );
        // upper wire on planks
        assert_eq!(layout.block(Coord::new(4, 0, 4)), Some(registry.redstone_wire));
        assert_eq!(layout.block(Coord::new(3, 0, 4)), Some(registry.planks));
    }

    #[test]
    fn test_pin_before_up_via_is_not_a_repeater() {
        let registry = BlockRegistry::default();
        let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
        let start = Coord::new(1, 0, 0);
        let stop = Coord::new(4, 0, 2);
        let waypoints = vec![Coord::new(1, 0, 1), Coord::new(4, 0, 1)];
        let routing = Routing::from([("n".to_string(), vec![segment(start, waypoints, stop)])]);
        let extracted = extractor.extract_routing(&routing).unwrap();
        assert_eq!(
            extracted["n"][0].path,
            vec![
                PathElement::Wire(start),
                PathElement::UpVia(Coord::new(1, 0, 1)),
                PathElement::Wire(stop),
            ]
        );

        let layout = extractor
            .extract_layout(&extracted, &placed(Dimensions::new(5, 1, 3), &[start, stop]))
            .unwrap();
        assert_eq!(layout.block(start), Some(1));
        assert_eq!(layout.count(registry.unpowered_repeater), 0);
    }

    #[test]
    fn test_vias_landing_on_stop_pin() {
        let registry = BlockRegistry::default();
        let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
        let dims = Dimensions::new(5, 1, 3);

        let (start, stop) = (Coord::new(1, 0, 0), Coord::new(4, 0, 2));
        let up = Routing::from([(
            "n".to_string(),
            vec![segment(start, vec![Coord::new(1, 0, 1), Coord::new(1, 0, 2)], stop)],
        )]);
        let extracted = extractor.extract_routing(&up).unwrap();
        let layout = extractor.extract_layout(&extracted, &placed(dims, &[start, stop])).unwrap();
        assert_eq!(layout.block(stop), Some(1));
        assert_eq!(layout.voxel(Coord::new(2, 0, 2)), Some((registry.redstone_torch, registry.torch_up)));
        assert_eq!(layout.block(Coord::new(3, 0, 2)), Some(registry.planks));
        assert_eq!(layout.block(Coord::new(1, 0, 1)), Some(registry.unpowered_repeater));

        let (start, stop) = (Coord::new(4, 0, 0), Coord::new(1, 0, 2));
        let down = Routing::from([(
            "n".to_string(),
            vec![segment(start, vec![Coord::new(4, 0, 1), Coord::new(4, 0, 2)], stop)],
        )]);
        let extracted = extractor.extract_routing(&down).unwrap();
        let layout = extractor.extract_layout(&extracted, &placed(dims, &[start, stop])).unwrap();
        assert_eq!(layout.block(stop), Some(1));
        assert_eq!(layout.voxel(Coord::new(3, 0, 2)), Some((registry.sticky_piston, registry.piston_down)));
        assert_eq!(layout.block(Coord::new(2, 0, 2)), Some(registry.redstone_block));
        assert_eq!(layout.block(Coord::new(0, 0, 2)), Some(registry.stone));
    }

    #[test]
    fn test_unsatisfiable_net_aborts_whole_routing() {
        let registry = BlockRegistry::default();
        let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
        let good = segment(Coord::new(1, 0, 0), vec![Coord::new(1, 0, 1), Coord::new(1, 0, 2)], Coord::new(1, 0, 3));
        // every voxel of the staircase is a corner
        let stairs: Vec<Coord> = (0..14).map(|i| Coord::new(1, (i + 1) / 2, i / 2 + 1)).collect();
        let bad = segment(Coord::new(1, 0, 0), stairs.clone(), Coord::new(1, 7, 8));
        let routing = Routing::from([("a".to_string(), vec![good]), ("b".to_string(), vec![bad])]);

        assert_eq!(
            extractor.extract_routing(&routing),
            Err(RouteError::UnsatisfiableSignal {
                at: stairs[12],
                strength: 0
            })
        );
    }

    #[test]
    fn test_down_via_column() {
        let registry = BlockRegistry::default();
        let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
        let start = Coord::new(5, 0, 0);
        let stop = Coord::new(2, 0, 3);
        let waypoints = vec![Coord::new(5, 0, 1), Coord::new(2, 0, 1), Coord::new(2, 0, 2)];
        let routing = Routing::from([("n".to_string(), vec![segment(start, waypoints, stop)])]);
        let extracted = extractor.extract_routing(&routing).unwrap();
        let layout = extractor
            .extract_layout(&extracted, &placed(Dimensions::new(6, 1, 4), &[start, stop]))
            .unwrap();

        assert_eq!(layout.voxel(Coord::new(4, 0, 1)), Some((registry.sticky_piston, registry.piston_down)));
        assert_eq!(layout.block(Coord::new(3, 0, 1)), Some(registry.redstone_block));
        assert_eq!(layout.block(Coord::new(2, 0, 1)), Some(registry.air));
        assert_eq!(layout.block(Coord::new(1, 0, 1)), Some(registry.stone));
        assert_eq!(layout.block(Coord::new(2, 0, 2)), Some(registry.redstone_wire));
    }

    #[test]
    fn test_leading_repeater_orientation() {
        let registry = BlockRegistry::default();
        let stamp = |sequence: &[(&str, PathElement)]| {
            let mut stamper = Stamper::new(&registry, 0, Layout::new(Dimensions::new(2, 3, 3), 0), HashSet::new());
            stamper.stamp(sequence).map(|_| stamper.into_layout())
        };

        let layout = stamp(&[
            ("n", PathElement::Wire(Coord::new(1, 0, 1))),
            ("n", PathElement::Repeater(Coord::new(1, 1, 1))),
        ])
        .unwrap();
        assert_eq!(layout.data_at(Coord::new(1, 1, 1)), Some(registry.repeater_data(Facing::South)));

        for sequence in [
            vec![("n", PathElement::Repeater(Coord::new(1, 1, 1)))],
            vec![("n", PathElement::Noop), ("n", PathElement::Repeater(Coord::new(1, 1, 1)))],
            vec![
                ("n", PathElement::Wire(Coord::new(1, 1, 1))),
                ("n", PathElement::Repeater(Coord::new(1, 1, 1))),
            ],
        ] {
            assert!(matches!(
                stamp(&sequence),
                Err(RouteError::AmbiguousOrientation { .. }) | Err(RouteError::Core(CoreError::AmbiguousWrite { .. }))
            ));
        }
    }

    #[test]
    fn test_cross_net_collision_rejected() {
        let registry = BlockRegistry::default();
        let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
        let routing = Routing::from([
            (
                "a".to_string(),
                vec![segment(Coord::new(1, 0, 0), vec![Coord::new(1, 0, 1), Coord::new(1, 0, 2)], Coord::new(1, 0, 3))],
            ),
            (
                "b".to_string(),
                vec![segment(Coord::new(1, 1, 2), vec![Coord::new(1, 0, 2)], Coord::new(1, 0, 3))],
            ),
        ]);
        let extracted = extractor.extract_routing(&routing).unwrap();
        let pins = [Coord::new(1, 0, 0), Coord::new(1, 0, 3), Coord::new(1, 1, 2)];
        let err = extractor
            .extract_layout(&extracted, &placed(Dimensions::new(2, 2, 4), &pins))
            .unwrap_err();
        assert!(matches!(err, RouteError::Core(CoreError::OverlapViolation { .. })));
    }

    #[test]
    fn test_shared_trunk_same_net() {
        let registry = BlockRegistry::default();
        let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
        let driver = Coord::new(1, 0, 0);
        let routing = Routing::from([(
            "fanout".to_string(),
            vec![
                segment(driver, vec![Coord::new(1, 0, 1), Coord::new(1, 0, 2)], Coord::new(1, 0, 3)),
                segment(driver, vec![Coord::new(1, 0, 1), Coord::new(1, 1, 1)], Coord::new(1, 2, 1)),
            ],
        )]);
        let extracted = extractor.extract_routing(&routing).unwrap();
        let pins = [driver, Coord::new(1, 0, 3), Coord::new(1, 2, 1)];
        let layout = extractor
            .extract_layout(&extracted, &placed(Dimensions::new(2, 3, 4), &pins))
            .unwrap();
        assert_eq!(layout.count(registry.redstone_wire), 3);
    }

    #[test]
    fn test_wire_into_cell_voxel_rejected() {
        let registry = BlockRegistry::default();
        let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
        let start = Coord::new(1, 0, 0);
        let stop = Coord::new(1, 0, 3);
        let routing = Routing::from([(
            "n".to_string(),
            vec![segment(start, vec![Coord::new(1, 0, 1), Coord::new(1, 0, 2)], stop)],
        )]);
        let extracted = extractor.extract_routing(&routing).unwrap();
        let mut layout = placed(Dimensions::new(2, 1, 4), &[start, stop]);
        layout.blocks[(1, 0, 2)] = registry.glass;
        assert!(matches!(
            extractor.extract_layout(&extracted, &layout),
            Err(RouteError::Core(CoreError::OverlapViolation { .. }))
        ));

        // floor-level wire has nowhere to put its support
        let low = Routing::from([(
            "n".to_string(),
            vec![segment(Coord::new(0, 0, 0), vec![Coord::new(0, 0, 1)], Coord::new(0, 0, 2))],
        )]);
        let extracted = extractor.extract_routing(&low).unwrap();
        assert!(matches!(
            extractor.extract_layout(&extracted, &Layout::new(Dimensions::new(1, 1, 3), 0)),
            Err(RouteError::Core(CoreError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_geometry_violation_surfaces() {
        let registry = BlockRegistry::default();
        let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
        let bad = segment(Coord::new(1, 0, 0), vec![Coord::new(1, 1, 1)], Coord::new(1, 1, 2));
        assert_eq!(
            extractor.extract_net_segment(&bad),
            Err(RouteError::GeometryViolation {
                from: Coord::new(1, 0, 0),
                to: Coord::new(1, 1, 1)
            })
        );
    }
}
