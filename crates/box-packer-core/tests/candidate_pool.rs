use box_packer_core::candidates::{CandidatePool, SENTINEL};
use box_packer_core::catalog::ItemCatalog;
use box_packer_core::Size;

fn pool(container: Size, rotate: bool, items: &[Size]) -> CandidatePool {
    let mut catalog = ItemCatalog::new(rotate);
    catalog.insert_all(items.iter().copied());
    catalog.normalize();
    CandidatePool::build(catalog.entries(), container, rotate)
}

#[test]
fn rotated_variants_are_paired() {
    let p = pool(
        Size::new(10, 10),
        true,
        &[Size::new(3, 5), Size::new(5, 3), Size::new(4, 4)],
    );
    let sizes: Vec<Size> = p.candidates().iter().map(|c| c.size).collect();
    assert_eq!(
        sizes,
        vec![Size::new(3, 5), Size::new(4, 4), Size::new(5, 3)]
    );

    assert_eq!(p.get(1).partner, Some(3));
    assert_eq!(p.get(3).partner, Some(1));
    assert_eq!(p.get(2).partner, None);
    assert_eq!(p.get(1).entry, p.get(3).entry);
    assert_eq!(p.get(1).count, 2);

    assert_eq!(p.item_count(), 3);
    assert_eq!(p.item_area(), 16 + 2 * 15);
    assert_eq!(p.get(SENTINEL).entry, None);
}

#[test]
fn take_and_put_back_keep_partners_in_step() {
    let mut p = pool(
        Size::new(10, 10),
        true,
        &[Size::new(3, 5), Size::new(5, 3), Size::new(4, 4)],
    );
    assert_eq!(p.remaining().collect::<Vec<_>>(), vec![1, 2, 3]);

    p.take(3);
    assert_eq!(p.get(1).count, 1);
    assert_eq!(p.get(3).count, 1);
    p.take(1);
    assert_eq!(p.get(1).count, 0);
    assert_eq!(p.get(3).count, 0);
    assert_eq!(p.remaining().collect::<Vec<_>>(), vec![2]);
    assert_eq!(p.min_remaining_height(), Some(4));
    assert_eq!(p.min_remaining_width(), Some(4));

    p.take(2);
    assert!(p.is_exhausted());
    assert_eq!(p.min_remaining_height(), None);

    p.put_back(2);
    p.put_back(1);
    p.put_back(3);
    assert_eq!(p.remaining().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(p.get(1).count, 2);
    assert_eq!(p.get(3).count, 2);
    assert_eq!(p.min_remaining_height(), Some(3));
    assert_eq!(p.min_remaining_width(), Some(3));
}

#[test]
fn only_orientations_that_fit_are_kept() {
    // stored as 5x3, which is too wide; only the 3x5 turn fits
    let p = pool(Size::new(4, 10), true, &[Size::new(3, 5)]);
    assert_eq!(p.len(), 1);
    let c = p.get(1);
    assert_eq!(c.size, Size::new(3, 5));
    assert_eq!(c.partner, None);
    assert_eq!(p.item_count(), 1);
}

#[test]
fn squares_are_not_duplicated() {
    let p = pool(Size::new(10, 10), true, &[Size::new(4, 4), Size::new(4, 4)]);
    assert_eq!(p.len(), 1);
    assert_eq!(p.get(1).count, 2);
    assert_eq!(p.item_count(), 2);
}

#[test]
fn without_rotation_each_entry_is_one_candidate() {
    let p = pool(
        Size::new(10, 10),
        false,
        &[Size::new(3, 5), Size::new(5, 3), Size::new(0, 2), Size::new(11, 1)],
    );
    let sizes: Vec<Size> = p.candidates().iter().map(|c| c.size).collect();
    assert_eq!(sizes, vec![Size::new(3, 5), Size::new(5, 3)]);
    assert!(p.candidates().iter().all(|c| c.partner.is_none()));
    assert_eq!(p.item_count(), 2);
    assert_eq!(p.item_area(), 30);
}

#[test]
fn min_width_follows_unlink_and_relink() {
    let mut p = pool(
        Size::new(10, 10),
        false,
        &[Size::new(6, 4), Size::new(2, 3), Size::new(5, 1)],
    );
    // search order: 6x4, 2x3, 5x1
    assert_eq!(p.min_remaining_width(), Some(2));
    p.take(2);
    assert_eq!(p.min_remaining_width(), Some(5));
    p.take(3);
    assert_eq!(p.min_remaining_width(), Some(6));
    p.take(1);
    assert_eq!(p.min_remaining_width(), None);
    p.put_back(1);
    assert_eq!(p.min_remaining_width(), Some(6));
    p.put_back(3);
    p.put_back(2);
    assert_eq!(p.min_remaining_width(), Some(2));
}
