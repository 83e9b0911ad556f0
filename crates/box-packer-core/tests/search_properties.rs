use std::collections::HashSet;

use box_packer_core::catalog::ItemCatalog;
use box_packer_core::search::Search;
use box_packer_core::{BoxPacker, ContinueSearch, Placement, Rect, Size};
use rand::{Rng, SeedableRng};

fn disjoint(rects: &[Rect]) -> bool {
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if rects[i].overlaps(&rects[j]) {
                return false;
            }
        }
    }
    true
}

fn random_items(seed: u64, count: usize, max_side: u32) -> Vec<Size> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Size::new(rng.gen_range(1..=max_side), rng.gen_range(1..=max_side)))
        .collect()
}

fn collect(width: u32, height: u32, rotate: bool, items: &[Size]) -> Vec<Vec<Placement>> {
    let mut packer = BoxPacker::new(width, height, rotate).unwrap();
    packer.insert_all(items.iter().copied());
    let mut reports = Vec::new();
    let stats = packer.pack(|p: &[Placement]| {
        reports.push(p.to_vec());
        false
    });
    assert_eq!(stats.solutions_reported, reports.len());
    reports
}

#[test]
fn reported_solutions_are_valid() {
    let container = Rect::new(0, 0, 12, 9);
    for seed in 0..6u64 {
        let items = random_items(seed, 6, 6);
        for rotate in [false, true] {
            let reports = collect(container.w, container.h, rotate, &items);
            let mut last_area = 0u64;
            for solution in &reports {
                let rects: Vec<Rect> = solution.iter().map(|p| p.rect).collect();
                assert!(disjoint(&rects), "seed {seed}: overlap in {solution:?}");
                assert!(rects.iter().all(|r| container.contains(r)));

                let indices: HashSet<usize> = solution.iter().map(|p| p.index).collect();
                assert_eq!(indices.len(), solution.len(), "duplicate index");
                assert!(indices.iter().all(|&i| i < items.len()));

                for p in solution {
                    let given = items[p.index];
                    let placed = p.rect.size();
                    if rotate {
                        assert!(placed == given || placed == given.rotated());
                    } else {
                        assert_eq!(placed, given);
                    }
                }

                let area: u64 = rects.iter().map(|r| r.area()).sum();
                assert!(area >= last_area, "seed {seed}: area went down");
                last_area = area;
            }
        }
    }
}

#[test]
fn best_area_matches_the_last_report() {
    let items = random_items(7, 7, 5);
    let mut packer = BoxPacker::new(10, 8, true).unwrap();
    packer.insert_all(items.iter().copied());
    let mut last = 0u64;
    let stats = packer.pack(|p: &[Placement]| {
        last = p.iter().map(|p| p.rect.area()).sum();
        false
    });
    assert!(stats.solutions_reported > 0);
    assert_eq!(stats.best_area, last);
    assert!(stats.best_area <= stats.container_area);
    assert!(stats.best_area <= stats.item_area);
}

#[test]
fn search_is_deterministic() {
    let items = random_items(11, 6, 5);
    let a = collect(9, 9, true, &items);
    let b = collect(9, 9, true, &items);
    assert_eq!(a, b);
}

#[test]
fn partial_solution_reported_when_nothing_more_fits() {
    let reports = collect(5, 5, false, &[Size::new(3, 3), Size::new(3, 3)]);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].len(), 1);
    assert_eq!(reports[0][0].rect, Rect::new(0, 0, 3, 3));
}

#[test]
fn search_leaves_no_placement_behind() {
    let mut catalog = ItemCatalog::new(true);
    catalog.insert_all(random_items(3, 6, 4));
    catalog.normalize();
    let mut search = Search::new(catalog.entries(), Size::new(8, 6), true);
    let before: Vec<_> = search.pool().candidates().to_vec();

    let stats = search.run(&mut ContinueSearch, u64::MAX);

    assert!(stats.iterations > 0);
    assert_eq!(search.packed_area(), 0);
    assert_eq!(search.mask().occupied_cells(), 0);
    assert_eq!(search.pool().candidates(), before.as_slice());
}

#[test]
fn reported_area_tracks_the_packed_area() {
    for seed in 20..26u64 {
        let mut catalog = ItemCatalog::new(true);
        catalog.insert_all(random_items(seed, 6, 5));
        catalog.normalize();
        let mut search = Search::new(catalog.entries(), Size::new(9, 7), true);
        let (item_count, item_area) = (search.pool().item_count(), search.pool().item_area());

        let mut best_partial = 0u64;
        let mut last = 0u64;
        let mut callback = |p: &[Placement]| {
            let area: u64 = p.iter().map(|p| p.rect.area()).sum();
            if p.len() == item_count {
                assert_eq!(area, item_area, "seed {seed}");
            } else {
                assert!(area > best_partial, "seed {seed}: partial did not improve");
                best_partial = area;
            }
            last = area;
            false
        };
        let stats = search.run(&mut callback, u64::MAX);

        assert!(stats.solutions_reported > 0);
        assert_eq!(stats.best_area, last, "seed {seed}");
    }
}
