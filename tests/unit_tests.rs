use naval_duel::{
    unit_spec, Ability, Coord, Duelist, GridError, HitOutcome, Orientation, PlacementError,
    ShotKind, Side, Unit, FLEET, TOTAL_FLEET_CELLS,
};

fn c(s: &str) -> Coord {
    s.parse().unwrap()
}

fn placed(name: &str, origin: &str, orientation: Orientation) -> Unit {
    let id = FLEET.iter().position(|s| s.name() == name).unwrap();
    let cells = FLEET[id].footprint(c(origin), orientation).unwrap();
    let mut duelist = Duelist::new(Side::A, "x");
    duelist.place_unit(id, cells).unwrap();
    duelist.units()[id].clone()
}

#[test]
fn catalog_matches_the_fleet() {
    let names: Vec<&str> = FLEET.iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        vec!["Airport", "Radar Tower", "HQ", "Railway Gun", "MMRL", "Tank"]
    );
    assert_eq!(unit_spec("HQ").unwrap().length(), 2);
    assert_eq!(unit_spec("Airport").unwrap().shape(), (2, 4));
    assert_eq!(
        unit_spec("MMRL").unwrap().ability(),
        Some(Ability::Barrage { rockets: 5 })
    );
    assert_eq!(unit_spec("Radar Tower").unwrap().ability(), None);
    assert!(unit_spec("Battleship").is_none());
    assert_eq!(TOTAL_FLEET_CELLS, 28);
}

#[test]
fn footprint_rotates_and_checks_bounds() {
    let airport = unit_spec("Airport").unwrap();
    let flat = airport.footprint(c("A1"), Orientation::Horizontal).unwrap();
    assert_eq!(flat.len(), 8);
    assert!(flat.contains(&c("B4")));
    let upright = airport.footprint(c("A1"), Orientation::Vertical).unwrap();
    assert!(upright.contains(&c("D2")));
    assert!(matches!(
        airport.footprint(c("J8"), Orientation::Horizontal),
        Err(PlacementError::OutOfBounds(_))
    ));
}

#[test]
fn destroyed_is_reported_exactly_once() {
    let mut hq = placed("HQ", "B2", Orientation::Horizontal);
    assert!(hq.is_alive());
    assert_eq!(hq.apply_hit(c("B2")), Ok(HitOutcome::StillAlive));
    assert_eq!(hq.intact_cells(), 1);
    assert!(hq.is_hit(c("B2")));
    assert!(!hq.is_hit(c("B3")));
    assert_eq!(hq.apply_hit(c("B3")), Ok(HitOutcome::JustDestroyed));
    assert!(!hq.is_alive());
    assert_eq!(hq.apply_hit(c("B3")), Ok(HitOutcome::AlreadyDestroyed));
    assert_eq!(hq.apply_hit(c("B2")), Ok(HitOutcome::AlreadyDestroyed));
}

#[test]
fn hits_off_the_footprint_are_errors() {
    let mut tank = placed("Tank", "A9", Orientation::Horizontal);
    assert_eq!(tank.apply_hit(c("A8")), Err(GridError::NotOnUnit(c("A8"))));
    assert!(tank.is_alive());
}

#[test]
fn ability_follows_toggle_and_life() {
    let mut airport = placed("Airport", "D1", Orientation::Horizontal);
    assert_eq!(airport.spec().ability().map(|a| a.kind()), Some(ShotKind::Area));
    assert!(airport.can_fire());
    airport.toggle_ability();
    assert!(!airport.can_fire());
    airport.toggle_ability();
    assert!(airport.can_fire());

    for cell in airport.cells().to_vec() {
        airport.apply_hit(cell).unwrap();
    }
    assert!(airport.ability_available());
    assert!(!airport.can_fire());

    let radar = placed("Radar Tower", "G1", Orientation::Horizontal);
    assert!(!radar.can_fire());
}
