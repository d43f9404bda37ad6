use voxsolid_lib::{fill_interior, VoxelVolume};

fn volume_from_fn<F: FnMut([usize; 3]) -> u8>(dims: [usize; 3], mut f: F) -> VoxelVolume<u8> {
    let mut volume = VoxelVolume::new_filled(dims, 0).unwrap();
    for z in 0..dims[0] {
        for y in 0..dims[1] {
            for x in 0..dims[2] {
                volume.set([z, y, x], f([z, y, x]));
            }
        }
    }
    volume
}

/// Whether all coordinates of the index lie in the given inclusive range
fn in_shell(index: [usize; 3], lo: usize, hi: usize) -> bool {
    index.iter().all(|&i| (lo..=hi).contains(&i))
}

#[test]
fn test_nested_shells() {
    // Two concentric closed shells in a 11^3 grid: outer from 1 to 9, inner from 3 to 7.
    // The gap between the shells and the core are both unreachable from the boundary, so
    // everything inside the outer shell ends up solid.
    let volume = volume_from_fn([11, 11, 11], |index| {
        let on_outer = in_shell(index, 1, 9) && !in_shell(index, 2, 8);
        let on_inner = in_shell(index, 3, 7) && !in_shell(index, 4, 6);
        (on_outer || on_inner) as u8
    });

    let solid = fill_interior(&volume).unwrap();
    for z in 0..11 {
        for y in 0..11 {
            for x in 0..11 {
                let index = [z, y, x];
                let expected = in_shell(index, 1, 9) as u8;
                assert_eq!(solid.get(index), Some(&expected), "cell {:?}", index);
            }
        }
    }
}

#[test]
fn test_tunnel_to_boundary() {
    // A closed shell with a straight 6-connected tunnel from its cavity to the z = 0 face
    // of the grid: the cavity is reachable and stays empty, only the shell itself is solid
    let volume = volume_from_fn([11, 11, 11], |index| {
        let on_shell = in_shell(index, 2, 8) && !in_shell(index, 3, 7);
        let in_tunnel = index[0] <= 2 && index[1] == 5 && index[2] == 5;
        (on_shell && !in_tunnel) as u8
    });

    let solid = fill_interior(&volume).unwrap();

    // Cavity and tunnel are exterior
    assert_eq!(solid.get([5, 5, 5]), Some(&0));
    assert_eq!(solid.get([0, 5, 5]), Some(&0));
    // The remaining shell is solid
    assert_eq!(solid.get([2, 5, 6]), Some(&1));
    assert_eq!(solid.get([8, 5, 5]), Some(&1));

    // Exactly the (punctured) shell cells are solid, the cavity leaked out
    let n_solid_input = volume.data().iter().filter(|&&v| v != 0).count();
    let n_solid_mask = solid.data().iter().filter(|&&m| m != 0).count();
    assert_eq!(n_solid_input, n_solid_mask);
}

#[test]
fn test_diagonal_contact_is_not_connected() {
    // Two empty regions touching only at an edge/corner are not 6-connected: a solid
    // diagonal wall across the grid keeps one side enclosed if it is otherwise sealed.
    // Here the whole grid boundary is solid except for a single opening on one side of
    // the wall, so the other side stays an enclosed void.
    let volume = volume_from_fn([5, 5, 5], |[z, y, x]| {
        let boundary = z == 0 || z == 4 || y == 0 || y == 4 || x == 0 || x == 4;
        let wall = x == y;
        let opening = [z, y, x] == [2, 2, 0];
        ((boundary || wall) && !opening) as u8
    });

    let solid = fill_interior(&volume).unwrap();

    // The side of the wall with the opening (x < y) is exterior
    assert_eq!(solid.get([2, 2, 0]), Some(&0));
    assert_eq!(solid.get([2, 2, 1]), Some(&0));
    assert_eq!(solid.get([2, 3, 2]), Some(&0));
    // The sealed side (x > y) touches the open side only across the diagonal wall and
    // stays an enclosed void
    assert_eq!(solid.get([2, 1, 2]), Some(&1));
    assert_eq!(solid.get([2, 2, 3]), Some(&1));
}

#[test]
fn test_fill_is_idempotent() {
    // A solid mask contains no enclosed empty space anymore, so filling it again is a
    // fixed point
    let volume = volume_from_fn([9, 9, 9], |index| {
        (in_shell(index, 2, 6) && !in_shell(index, 3, 5)) as u8
    });

    let once = fill_interior(&volume).unwrap();
    let twice = fill_interior(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_solidify_large_shell() {
    // Performance/correctness smoke test on a larger grid: a 64^3 grid with a big closed
    // box shell from 8 to 55
    let volume = volume_from_fn([64, 64, 64], |index| {
        (in_shell(index, 8, 55) && !in_shell(index, 9, 54)) as u8
    });

    let solid = fill_interior(&volume).unwrap();

    let n_solid = solid.data().iter().filter(|&&m| m != 0).count();
    // Everything from 8 to 55 (a 48^3 block) is solid
    assert_eq!(n_solid, 48 * 48 * 48);
    assert_eq!(solid.get([32, 32, 32]), Some(&1));
    assert_eq!(solid.get([0, 32, 32]), Some(&0));
}
