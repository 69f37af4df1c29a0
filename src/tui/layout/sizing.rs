//! Partitioning of a container's extent among its children.
//!
//! Static children keep their size. Dynamic children split what is left
//! evenly; the last dynamic child absorbs the integer-division remainder so
//! the extents always add up to the container exactly.

/// How a child is sized along its parent's split axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sizing {
    #[default]
    Dynamic,
    Static(u16),
}

impl Sizing {
    pub fn is_static(self) -> bool {
        matches!(self, Sizing::Static(_))
    }
}

/// Smallest extent that fits every static child plus one cell per dynamic child.
pub fn required_extent(sizings: &[Sizing]) -> u16 {
    sizings.iter().fold(0u16, |acc, sizing| {
        acc.saturating_add(match sizing {
            Sizing::Static(n) => *n,
            Sizing::Dynamic => 1,
        })
    })
}

/// Extent of each child along the split axis, in child order.
///
/// When `total` is smaller than the static sum the trailing children are
/// clamped so the result never exceeds `total`.
pub fn partition(total: u16, sizings: &[Sizing]) -> Vec<u16> {
    let static_sum: u16 = sizings
        .iter()
        .map(|sizing| match sizing {
            Sizing::Static(n) => *n,
            Sizing::Dynamic => 0,
        })
        .fold(0u16, u16::saturating_add);
    let dynamic_count = sizings.iter().filter(|s| !s.is_static()).count() as u16;

    let remaining = total.saturating_sub(static_sum);
    let share = if dynamic_count == 0 {
        0
    } else {
        remaining / dynamic_count
    };
    let last_dynamic = sizings.iter().rposition(|s| !s.is_static());

    let mut used = 0u16;
    sizings
        .iter()
        .enumerate()
        .map(|(index, sizing)| {
            let wanted = match sizing {
                Sizing::Static(n) => *n,
                Sizing::Dynamic if Some(index) == last_dynamic => {
                    remaining - share * (dynamic_count - 1)
                }
                Sizing::Dynamic => share,
            };
            let extent = wanted.min(total - used);
            used += extent;
            extent
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Sizing::{Dynamic, Static};

    #[test]
    fn test_even_split() {
        assert_eq!(partition(40, &[Dynamic, Dynamic]), vec![20, 20]);
    }

    #[test]
    fn test_remainder_goes_to_last_dynamic() {
        assert_eq!(partition(41, &[Dynamic, Dynamic]), vec![20, 21]);
        assert_eq!(partition(10, &[Dynamic, Dynamic, Dynamic]), vec![3, 3, 4]);
    }

    #[test]
    fn test_remainder_skips_trailing_static() {
        assert_eq!(partition(23, &[Dynamic, Dynamic, Static(5)]), vec![9, 9, 5]);
        assert_eq!(partition(24, &[Dynamic, Dynamic, Static(5)]), vec![9, 10, 5]);
    }

    #[test]
    fn test_static_only() {
        assert_eq!(partition(30, &[Static(10), Static(5)]), vec![10, 5]);
    }

    #[test]
    fn test_single_child_takes_everything() {
        assert_eq!(partition(17, &[Dynamic]), vec![17]);
    }

    #[test]
    fn test_sum_equals_total_whenever_it_fits() {
        let layouts: [&[Sizing]; 5] = [
            &[Dynamic, Dynamic],
            &[Static(3), Dynamic],
            &[Dynamic, Static(7), Dynamic, Dynamic],
            &[Static(1), Static(2), Dynamic],
            &[Dynamic, Dynamic, Dynamic, Dynamic, Dynamic],
        ];
        for sizings in layouts {
            for total in required_extent(sizings)..200 {
                let extents = partition(total, sizings);
                assert_eq!(extents.iter().sum::<u16>(), total, "{sizings:?} total={total}");
                for (extent, sizing) in extents.iter().zip(sizings) {
                    match sizing {
                        Static(n) => assert_eq!(extent, n),
                        Dynamic => assert!(*extent >= 1),
                    }
                }
            }
        }
    }

    #[test]
    fn test_overflowing_statics_are_clamped() {
        let extents = partition(6, &[Static(4), Dynamic, Static(4)]);
        assert_eq!(extents, vec![4, 0, 2]);
        assert!(extents.iter().sum::<u16>() <= 6);
    }

    #[test]
    fn test_required_extent() {
        assert_eq!(required_extent(&[Dynamic, Static(5), Dynamic]), 7);
        assert_eq!(required_extent(&[]), 0);
    }
}
