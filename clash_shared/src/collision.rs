//! Overlap queries between entities and groups.

use crate::{
    ecs::{EntityId, Group},
    math::Rect,
};

/// Anything with a collision rectangle.
pub trait Bounded {
    fn rect(&self) -> Rect;
}

/// Members of `group` overlapping `rect`, in group order.
pub fn collide_one<T: Bounded>(rect: &Rect, group: &Group<T>) -> Vec<EntityId> {
    group
        .iter()
        .filter(|(_, member)| member.rect().collides(rect))
        .map(|(id, _)| id)
        .collect()
}

/// For each member of `a` that overlaps anything in `b`, the ids it hits.
pub fn group_collide<A: Bounded, B: Bounded>(
    a: &Group<A>,
    b: &Group<B>,
) -> Vec<(EntityId, Vec<EntityId>)> {
    a.iter()
        .filter_map(|(id, member)| {
            let hits = collide_one(&member.rect(), b);
            (!hits.is_empty()).then_some((id, hits))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityAllocator;

    struct Boxed(Rect);

    impl Bounded for Boxed {
        fn rect(&self) -> Rect {
            self.0
        }
    }

    #[test]
    fn group_collide_reports_every_overlap() {
        let mut ids = EntityAllocator::default();
        let mut shots = Group::new();
        let mut targets = Group::new();

        let hit_both = ids.next();
        let miss = ids.next();
        shots.insert(hit_both, Boxed(Rect::new(10, 10, 20, 4)));
        shots.insert(miss, Boxed(Rect::new(500, 500, 6, 12)));

        let left = ids.next();
        let right = ids.next();
        targets.insert(left, Boxed(Rect::new(0, 0, 15, 15)));
        targets.insert(right, Boxed(Rect::new(20, 0, 15, 15)));

        let hits = group_collide(&shots, &targets);
        assert_eq!(hits, vec![(hit_both, vec![left, right])]);
    }

    #[test]
    fn collide_one_ignores_touching() {
        let mut ids = EntityAllocator::default();
        let mut group = Group::new();
        group.insert(ids.next(), Boxed(Rect::new(48, 0, 10, 10)));
        assert!(collide_one(&Rect::new(0, 0, 48, 48), &group).is_empty());
    }
}
