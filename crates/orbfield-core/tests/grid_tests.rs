use glam::Vec2;
use orbfield_core::spatial::PairGrid;

#[test]
fn test_grid_build_and_query() {
    let mut grid = PairGrid::new(1.0, 1024, 100);

    let positions = vec![Vec2::new(0.1, 0.1), Vec2::new(0.2, 0.2), Vec2::new(10.0, 10.0)];
    grid.build(&positions);

    let mut neighbors = Vec::new();
    grid.query_neighbors(positions[0], |idx| neighbors.push(idx));

    assert!(neighbors.contains(&0), "should find self");
    assert!(neighbors.contains(&1), "should find nearby particle");
    assert!(!neighbors.contains(&2), "should NOT find far particle");
}

#[test]
fn test_grid_finds_adjacent_cell() {
    let mut grid = PairGrid::new(50.0, 1024, 10);
    // Different cells, 2 px apart.
    let positions = vec![Vec2::new(49.0, 10.0), Vec2::new(51.0, 10.0)];
    grid.build(&positions);

    let mut neighbors = Vec::new();
    grid.query_neighbors(positions[0], |idx| neighbors.push(idx));
    assert!(neighbors.contains(&1));
}

#[test]
fn test_grid_all_particles_found() {
    let mut grid = PairGrid::for_population(40.0, 1000);

    let positions: Vec<Vec2> = (0..1000)
        .map(|i| {
            let t = i as f32 / 1000.0;
            let angle = t * std::f32::consts::TAU * 20.0;
            let r = 50.0 + t * 400.0;
            Vec2::new(angle.cos() * r, angle.sin() * r)
        })
        .collect();

    grid.build(&positions);

    for (i, &pos) in positions.iter().enumerate() {
        let mut found_self = false;
        grid.query_neighbors(pos, |idx| {
            if idx == i {
                found_self = true;
            }
        });
        assert!(found_self, "particle {} not found in its own cell query", i);
    }
}

#[test]
fn test_grid_empty() {
    let mut grid = PairGrid::new(1.0, 1024, 100);
    grid.build(&[]);

    let mut count = 0;
    grid.query_neighbors(Vec2::ZERO, |_| count += 1);
    assert_eq!(count, 0);
}

#[test]
fn test_grid_rebuild() {
    let mut grid = PairGrid::new(1.0, 1024, 100);

    grid.build(&[Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0)]);
    grid.build(&[Vec2::new(5.0, 5.0), Vec2::new(0.0, 0.0)]);

    let mut neighbors = Vec::new();
    grid.query_neighbors(Vec2::ZERO, |idx| neighbors.push(idx));
    assert!(neighbors.contains(&1), "should find particle 1 at origin after rebuild");
    assert!(!neighbors.contains(&0));
}

#[test]
fn test_grid_negative_positions() {
    let mut grid = PairGrid::new(1.0, 1024, 100);
    let positions = vec![Vec2::new(-1.0, -1.0), Vec2::new(-0.9, -1.0), Vec2::new(5.0, 5.0)];
    grid.build(&positions);

    let mut neighbors = Vec::new();
    grid.query_neighbors(Vec2::new(-1.0, -1.0), |idx| neighbors.push(idx));

    assert!(neighbors.contains(&0), "should find particle 0 at negative position");
    assert!(neighbors.contains(&1), "should find nearby particle 1 at negative position");
    assert!(!neighbors.contains(&2));
}

#[test]
fn test_grid_grows_past_initial_capacity() {
    let mut grid = PairGrid::new(10.0, 64, 2);
    let positions: Vec<Vec2> = (0..20).map(|i| Vec2::new(i as f32, 0.0)).collect();
    grid.build(&positions);

    let mut neighbors = Vec::new();
    grid.query_neighbors(Vec2::ZERO, |idx| neighbors.push(idx));
    for i in 0..20 {
        assert!(neighbors.contains(&i));
    }
}
