use ir_battleship::{
    BoardError, Direction, GridPoint, Ship, ShipShape, ShipStatus, DEFAULT_POS, DOT_SHIP,
    I_SHIP, L_SHIP, SHORT_SHIP,
};

fn cells(ship: &Ship) -> Vec<GridPoint> {
    let mut v: Vec<_> = ship.cells().collect();
    v.sort_by_key(|p| (p.y, p.x));
    v
}

#[test]
fn test_spawn_at_default_position() -> Result<(), BoardError> {
    let ship = Ship::new(I_SHIP)?;
    assert_eq!(ship.pos(), DEFAULT_POS);
    assert_eq!(ship.status(), ShipStatus::Idle);
    assert_eq!(
        cells(&ship),
        vec![GridPoint::new(1, 3), GridPoint::new(2, 3), GridPoint::new(3, 3)]
    );
    Ok(())
}

#[test]
fn test_rotation_quarter_turn() -> Result<(), BoardError> {
    let mut ship = Ship::new(L_SHIP)?;
    assert!(ship.rotate());
    // (1,1) -> (-1,1), (1,0) -> (0,1), (0,0) -> (0,0)
    assert_eq!(
        ship.offsets(),
        &[GridPoint::new(-1, 1), GridPoint::new(0, 1), GridPoint::new(0, 0)]
    );
    assert_eq!(ship.pos(), DEFAULT_POS);
    Ok(())
}

#[test]
fn test_rotation_four_times_is_identity() -> Result<(), BoardError> {
    for shape in [L_SHIP, I_SHIP, SHORT_SHIP, DOT_SHIP] {
        let mut ship = Ship::new(shape)?;
        let before = ship.offsets().to_vec();
        for _ in 0..4 {
            ship.rotate();
        }
        assert_eq!(ship.offsets(), before.as_slice(), "{}", shape.name());
    }
    Ok(())
}

#[test]
fn test_rotation_nudges_back_onto_grid() -> Result<(), BoardError> {
    let mut ship = Ship::new(I_SHIP)?;
    while ship.try_move(Direction::North) {}
    assert_eq!(ship.pos().y, 0);
    // Vertical now: offsets (0,-1),(0,0),(0,1) would poke above the grid.
    ship.rotate();
    assert!(ship.cells().all(|c| c.is_within_grid()));
    assert_eq!(ship.pos().y, 1);
    Ok(())
}

#[test]
fn test_move_stops_at_edges() -> Result<(), BoardError> {
    let mut ship = Ship::new(SHORT_SHIP)?;
    let mut steps = 0;
    while ship.try_move(Direction::West) {
        steps += 1;
    }
    // Offsets (-1,0),(0,0): the center can reach x = 1.
    assert_eq!(steps, 1);
    assert_eq!(ship.pos(), GridPoint::new(1, 3));
    assert!(!ship.try_move(Direction::West));
    assert_eq!(ship.pos(), GridPoint::new(1, 3));
    Ok(())
}

#[test]
fn test_register_impact_and_sunk() -> Result<(), BoardError> {
    let mut ship = Ship::new(SHORT_SHIP)?;
    assert!(!ship.is_sunk());
    assert!(ship.register_impact(GridPoint::new(1, 3)));
    assert!(!ship.is_sunk());
    assert!(!ship.register_impact(GridPoint::new(0, 0)));
    assert!(ship.register_impact(GridPoint::new(2, 3)));
    assert!(ship.is_sunk());
    assert_eq!(ship.hit_flags(), &[true, true]);
    Ok(())
}

#[test]
fn test_reset_restores_shape() -> Result<(), BoardError> {
    let mut ship = Ship::new(L_SHIP)?;
    ship.rotate();
    ship.try_move(Direction::South);
    ship.register_impact(ship.pos());
    ship.reset();
    assert_eq!(ship, Ship::new(L_SHIP)?);
    Ok(())
}

#[test]
fn test_invalid_shapes() {
    let empty = ShipShape::new("Empty", &[]);
    assert_eq!(Ship::new(empty), Err(BoardError::EmptyShape("Empty")));

    let dup = ShipShape::new("Dup", &[(0, 0), (1, 0), (0, 0)]);
    assert_eq!(
        dup.validate(),
        Err(BoardError::DuplicateOffset { name: "Dup", offset: GridPoint::new(0, 0) })
    );
}
