use super::*;
use crate::foundation::arena::Handle;

fn id(raw: u64) -> BindingId {
    BindingId::from_raw(raw)
}

fn row(y: f64) -> Rect {
    Rect::new(0.0, y, 100.0, y + 100.0)
}

fn input(raw: u64, attached: bool, rect: Rect, previous: u32) -> RankInput {
    RankInput {
        binding: id(raw),
        attached,
        rect,
        previous,
    }
}

fn priority_of(out: &[(BindingId, u32)], raw: u64) -> u32 {
    out.iter()
        .find(|(b, _)| *b == id(raw))
        .map(|(_, p)| *p)
        .unwrap()
}

#[test]
fn cover_ignores_empty_rects() {
    assert_eq!(covering_rect([Rect::ZERO]), None);
    let cover = covering_rect([row(0.0), Rect::ZERO, row(200.0)]).unwrap();
    assert_eq!(cover, Rect::new(0.0, 0.0, 100.0, 300.0));
}

#[test]
fn distance_is_normalized_manhattan() {
    let cover = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(distance(cover, cover), 0.0);
    let d = distance(Rect::new(100.0, 100.0, 200.0, 200.0), cover);
    assert!((d - 4.0).abs() < 1e-12);
}

#[test]
fn ranks_follow_distance_from_selection() {
    let selection = [(id(1), row(0.0))];
    let others = [
        input(2, true, row(400.0), 9),
        input(3, true, row(100.0), 9),
        input(4, false, row(200.0), 9),
        input(5, true, row(200.0), 9),
    ];
    let out = rank_priorities(&selection, &others);
    assert_eq!(priority_of(&out, 1), PRIORITY_SELECTED);
    assert_eq!(priority_of(&out, 3), 1);
    assert_eq!(priority_of(&out, 5), 2);
    assert_eq!(priority_of(&out, 2), 3);
    assert_eq!(priority_of(&out, 4), PRIORITY_UNRANKED);
}

#[test]
fn empty_selection_ranks_by_previous_priority() {
    let others = [
        input(1, true, row(0.0), 3),
        input(2, true, row(100.0), PRIORITY_SELECTED),
        input(3, true, row(200.0), 3),
    ];
    let out = rank_priorities(&[], &others);
    assert_eq!(priority_of(&out, 2), 1);
    assert_eq!(priority_of(&out, 1), 2);
    assert_eq!(priority_of(&out, 3), 3);
    assert!(out.iter().all(|(_, p)| *p != PRIORITY_SELECTED));
}
