mod support;

use naval_duel::shot::{authorize, available, complete, resolve, target_range};
use naval_duel::{
    CellMask, Mark, Pacing, ShotError, ShotKind, ShotOutcome, ShotResolver, Side,
    BARRAGE_PACING, BARRAGE_ROCKETS, BOARD_SIZE,
};
use rand::{rngs::SmallRng, SeedableRng};

use support::{c, cells, layout, placed_duelist};

fn resolver() -> ShotResolver<SmallRng> {
    ShotResolver::new(Pacing::none(), SmallRng::seed_from_u64(7))
}

#[test]
fn hq_is_destroyed_by_its_second_hit() {
    let mut shooter = placed_duelist(Side::A);
    let mut defender = placed_duelist(Side::B);
    let mut resolver = resolver();

    let first = resolver
        .fire(&mut shooter, &mut defender, ShotKind::Standard, cells("B2"))
        .unwrap();
    assert_eq!(first, vec![(c("B2"), Ok(ShotOutcome::Hit))]);
    assert!(defender.units()[2].is_alive());
    assert_eq!(shooter.view().get(c("B2")), Mark::Hit);

    let second = resolver
        .fire(&mut shooter, &mut defender, ShotKind::Standard, cells("B3"))
        .unwrap();
    assert_eq!(
        second,
        vec![(
            c("B3"),
            Ok(ShotOutcome::Destroyed {
                unit: "HQ".to_string(),
                cells: cells("B2;B3"),
            })
        )]
    );
    assert!(!defender.units()[2].is_alive());
    assert_eq!(shooter.view().get(c("B2")), Mark::Destroyed);
    assert_eq!(shooter.view().get(c("B3")), Mark::Destroyed);
}

#[test]
fn standard_shot_on_a_resolved_cell_is_rejected_before_resolution() {
    let mut shooter = placed_duelist(Side::A);
    let mut defender = placed_duelist(Side::B);
    let mut resolver = resolver();

    resolver
        .fire(&mut shooter, &mut defender, ShotKind::Standard, cells("C5"))
        .unwrap();
    let view_before = *shooter.view();
    assert_eq!(
        resolver.fire(&mut shooter, &mut defender, ShotKind::Standard, cells("C5")),
        Err(ShotError::AlreadyResolvedTarget(c("C5")))
    );
    assert_eq!(*shooter.view(), view_before);
}

#[test]
fn area_salvo_skips_resolved_targets_and_is_used_up() {
    let mut shooter = placed_duelist(Side::A);
    let mut defender = placed_duelist(Side::B);
    let mut resolver = resolver();

    resolver
        .fire(&mut shooter, &mut defender, ShotKind::Standard, cells("B2"))
        .unwrap();
    let results = resolver
        .fire(&mut shooter, &mut defender, ShotKind::Area, cells("C1;B2;D1"))
        .unwrap();
    assert_eq!(
        results,
        vec![
            (c("C1"), Ok(ShotOutcome::Miss)),
            (c("B2"), Err(ShotError::AlreadyResolvedTarget(c("B2")))),
            (c("D1"), Ok(ShotOutcome::Hit)),
        ]
    );
    assert!(shooter.view().misses().contains(c("C1")));
    assert!(!shooter.view().misses().contains(c("D1")));

    assert_eq!(
        authorize(&shooter, ShotKind::Area),
        Err(ShotError::Unavailable(ShotKind::Area))
    );
    assert!(!available(&shooter).contains(&ShotKind::Area));
    assert_eq!(
        resolver.fire(&mut shooter, &mut defender, ShotKind::Area, cells("F1")),
        Err(ShotError::Unavailable(ShotKind::Area))
    );
}

#[test]
fn target_count_is_enforced() {
    let shooter = placed_duelist(Side::A);
    let mut resolver = resolver();

    assert_eq!(target_range(&shooter, ShotKind::Standard), (1, 1));
    assert_eq!(target_range(&shooter, ShotKind::Area), (1, 7));
    assert_eq!(target_range(&shooter, ShotKind::HeavyLine), (1, 8));

    let eight = cells("A1;A2;A3;A4;A5;A6;A7;A8");
    assert_eq!(
        resolver.plan(&shooter, ShotKind::Area, eight.clone()),
        Err(ShotError::TargetCount {
            kind: ShotKind::Area,
            min: 1,
            max: 7,
            got: 8
        })
    );
    let salvo = resolver.plan(&shooter, ShotKind::HeavyLine, eight).unwrap();
    assert_eq!(salvo.targets.len(), 8);
    assert!(salvo.pacing.is_zero());

    assert!(matches!(
        resolver.plan(&shooter, ShotKind::Standard, Vec::new()),
        Err(ShotError::TargetCount { got: 0, .. })
    ));
}

#[test]
fn unknown_tokens_are_invalid() {
    assert_eq!("s".parse::<ShotKind>(), Ok(ShotKind::Standard));
    assert_eq!(" R ".parse::<ShotKind>(), Ok(ShotKind::Barrage));
    assert_eq!(
        "D".parse::<ShotKind>(),
        Err(ShotError::InvalidType("D".to_string()))
    );
    assert!("SA".parse::<ShotKind>().is_err());
}

#[test]
fn barrage_picks_its_own_targets_over_the_whole_board() {
    let shooter = placed_duelist(Side::A);
    let mut resolver = ShotResolver::new(Pacing::default(), SmallRng::seed_from_u64(3));

    let mut drawn = CellMask::new();
    for _ in 0..2000 {
        let salvo = resolver
            .plan(&shooter, ShotKind::Barrage, Vec::new())
            .unwrap();
        assert_eq!(salvo.targets.len(), BARRAGE_ROCKETS);
        assert!(salvo.targets.iter().all(|t| t.in_bounds()));
        assert_eq!(salvo.pacing, BARRAGE_PACING);
        drawn |= salvo.targets.iter().copied().collect::<CellMask>();
    }

    // The last row and the last column are reachable too.
    for corner in ["A10", "J1", "J10"] {
        assert!(drawn.contains(c(corner)), "{} was never drawn", corner);
    }
    assert_eq!(drawn.count(), BOARD_SIZE * BOARD_SIZE);
}

#[test]
fn abilities_die_with_their_unit() {
    let mut shooter = placed_duelist(Side::A);
    assert_eq!(
        available(&shooter),
        vec![
            ShotKind::Standard,
            ShotKind::Area,
            ShotKind::HeavyLine,
            ShotKind::Barrage
        ]
    );

    for cell in cells("D8;D9;E8;E9") {
        shooter.receive_hit(cell).unwrap();
    }
    assert_eq!(
        authorize(&shooter, ShotKind::Barrage),
        Err(ShotError::Unavailable(ShotKind::Barrage))
    );
    assert_eq!(authorize(&shooter, ShotKind::Standard), Ok(()));
}

#[test]
fn ability_is_a_toggle() {
    let mut shooter = placed_duelist(Side::A);
    complete(&mut shooter, ShotKind::HeavyLine);
    assert!(authorize(&shooter, ShotKind::HeavyLine).is_err());
    complete(&mut shooter, ShotKind::HeavyLine);
    assert!(authorize(&shooter, ShotKind::HeavyLine).is_ok());
    complete(&mut shooter, ShotKind::Standard);
    assert_eq!(available(&shooter).len(), 4);
}

#[test]
fn fleet_is_beaten_only_by_its_last_cell() {
    let mut shooter = placed_duelist(Side::A);
    let mut defender = placed_duelist(Side::B);
    let targets: Vec<_> = layout().into_iter().flatten().collect();
    let (last, rest) = targets.split_last().unwrap();

    for &cell in rest {
        resolve(shooter.view_mut(), &mut defender, cell).unwrap();
    }
    assert!(!defender.all_destroyed());
    resolve(shooter.view_mut(), &mut defender, *last).unwrap();
    assert!(defender.all_destroyed());
    assert_eq!(shooter.view().destroyed().count(), targets.len());
    assert!(shooter.view().hits().is_empty());
}
