use std::collections::BTreeMap;

use redpnr_core::{
    BlockRegistry, CellInstance, CellLibrary, CellTemplate, Coord, Dimensions, Facing, Net, Netlist, PinDirection,
    PinRef, Port, RotatedCells,
};
use redpnr_place::{Placed, Placement, Placer, PlacerConfig};
use redpnr_route::{ExtractorConfig, NetSegment, PathElement, RouteExtractor, Routing, SegmentEndpoint};

/// Two layers tall: a stone base under a wire, repeater, wire row.
fn buffer() -> CellTemplate {
    let port = |col, facing, direction| Port {
        coordinates: Coord::new(1, 0, col),
        facing,
        direction,
        level: 0,
    };
    CellTemplate {
        blocks: vec![vec![vec![1, 1, 1]], vec![vec![55, 93, 55]]],
        data: vec![vec![vec![0, 0, 0]], vec![vec![0, 1, 0]]],
        pins: BTreeMap::from([
            ("A".to_string(), port(0, Facing::West, PinDirection::Input)),
            ("Y".to_string(), port(2, Facing::East, PinDirection::Output)),
        ]),
        delay: 1,
    }
}

fn fixture() -> (Netlist, RotatedCells) {
    let registry = BlockRegistry::default();
    let templates = BTreeMap::from([("buf".to_string(), buffer())]);
    let cells = CellLibrary::from_templates(&templates, &registry, 0)
        .unwrap()
        .pregenerate(&registry);

    let mut netlist = Netlist::new();
    netlist.add_instance(CellInstance::new("u1", "buf"));
    netlist.add_instance(CellInstance::new("u2", "buf"));
    netlist.add_net(Net::new("n1", vec![PinRef::new("u1", "Y"), PinRef::new("u2", "A")]));
    (netlist, cells)
}

/// Place u2 at `u2`, materialize, and route n1 along `waypoints`.
fn run(u2: Coord, dimensions: Dimensions, waypoints: Vec<Coord>) -> (Vec<PathElement>, redpnr_core::Layout) {
    let registry = BlockRegistry::default();
    let (netlist, cells) = fixture();
    let placer = Placer::new(&netlist, &cells, &registry, PlacerConfig::default()).unwrap();

    let mut placement = Placement::new();
    placement.insert("u1", Placed::new(Coord::ORIGIN, Default::default()));
    placement.insert("u2", Placed::new(u2, Default::default()));
    let placed = placer.placement_to_layout(dimensions, &placement).unwrap();

    let endpoint = |pin: PinRef| {
        let at = placer.pin_coordinate(&placement, &pin).unwrap();
        SegmentEndpoint::new(pin, at)
    };
    let segment = NetSegment::new(endpoint(PinRef::new("u1", "Y")), endpoint(PinRef::new("u2", "A")), waypoints);
    let routing = Routing::from([("n1".to_string(), vec![segment])]);

    let extractor = RouteExtractor::new(&registry, ExtractorConfig::default());
    let extracted = extractor.extract_routing(&routing).unwrap();
    let layout = extractor.extract_layout(&extracted, &placed).unwrap();
    let path = extracted["n1"][0].path.clone();
    (path, layout)
}

fn row(layer: i32, cols: std::ops::RangeInclusive<i32>) -> Vec<Coord> {
    cols.map(|c| Coord::new(layer, 0, c)).collect()
}

#[test]
fn test_five_voxel_net() {
    let registry = BlockRegistry::default();
    let (path, layout) = run(Coord::new(0, 0, 8), Dimensions::new(2, 1, 11), row(1, 3..=7));

    assert_eq!(path.len(), 7);
    assert!(path.iter().all(|e| matches!(e, PathElement::Wire(_))));
    // two cells' worth of wire plus the route
    assert_eq!(layout.count(registry.redstone_wire), 4 + 5);
    assert_eq!(layout.count(registry.unpowered_repeater), 2);
    for col in 3..=7 {
        assert_eq!(layout.block(Coord::new(0, 0, col)), Some(registry.stone));
    }
}

#[test]
fn test_twenty_voxel_net() {
    let registry = BlockRegistry::default();
    let (path, layout) = run(Coord::new(0, 0, 23), Dimensions::new(2, 1, 26), row(1, 3..=22));

    let repeaters: Vec<_> = path
        .iter()
        .filter(|e| matches!(e, PathElement::Repeater(_)))
        .collect();
    assert_eq!(repeaters, vec![&PathElement::Repeater(Coord::new(1, 0, 15))]);
    assert_eq!(
        layout.voxel(Coord::new(1, 0, 15)),
        Some((registry.unpowered_repeater, registry.repeater_data(Facing::East)))
    );
}

#[test]
fn test_net_climbing_one_via() {
    let registry = BlockRegistry::default();
    let mut waypoints = row(1, 3..=4);
    waypoints.extend(row(4, 4..=7));
    let (path, layout) = run(Coord::new(3, 0, 8), Dimensions::new(5, 1, 11), waypoints);

    let vias: Vec<_> = path.iter().filter(|e| matches!(e, PathElement::UpVia(_))).collect();
    assert_eq!(vias, vec![&PathElement::UpVia(Coord::new(1, 0, 4))]);

    // the wire entering the via is stamped as a repeater facing it
    assert_eq!(
        layout.voxel(Coord::new(1, 0, 3)),
        Some((registry.unpowered_repeater, registry.repeater_data(Facing::East)))
    );
    assert_eq!(layout.block(Coord::new(2, 0, 4)), Some(registry.redstone_torch));
    assert_eq!(layout.block(Coord::new(4, 0, 4)), Some(registry.unlit_redstone_torch));
    assert_eq!(layout.block(Coord::new(4, 0, 5)), Some(registry.redstone_wire));
    assert_eq!(layout.block(Coord::new(3, 0, 5)), Some(registry.planks));
}
