use super::*;
use crate::collections::compare::Reverse;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn exp_counts() {
    let mut b = RbMultiSet::new();
    for x in [1, 1, 2, 2, 3, 3] {
        b.insert(x);
    }
    assert_eq!(b.count(&1), 2);
    assert_eq!(b.count(&3), 2);
    assert_eq!(b.count(&4), 0);
    assert!(b.len() == 6);
    assert!(b.contains(&2));
    assert!(!b.contains(&0));
    assert!(b.as_tree().validate(false).is_ok());
}

#[test]
fn exp_erase_all_and_remove_one() {
    let mut b = RbMultiSet::from([5, 3, 5, 1, 5, 3]);
    assert!(b.remove_one(&3));
    assert_eq!(b.count(&3), 1);
    assert_eq!(b.erase(&5), 3);
    assert_eq!(b.erase(&5), 0);
    assert!(!b.remove_one(&5));
    assert!(b.iter().copied().eq([1, 3]));
    assert!(b.find(&5) == b.cursor_end());
    assert_eq!(b.find(&3).get(), Some(&3));
    assert!(b.as_tree().validate(false).is_ok());
}

#[derive(Debug, Clone)]
struct Tagged(i32, usize);

#[test]
fn exp_equal_keys_in_insertion_order() {
    let mut b = RbMultiSet::with_comparator(|x: &Tagged, y: &Tagged| x.0.cmp(&y.0));
    for (i, k) in [4, 2, 4, 4, 1, 2, 4].into_iter().enumerate() {
        b.insert(Tagged(k, i));
    }
    let tags: Vec<usize> = b.equal_range(&Tagged(4, 0)).map(|t| t.1).collect();
    assert_eq!(tags, [0, 2, 3, 6]);
    assert_eq!(b.find(&Tagged(2, 0)).get().map(|t| t.1), Some(1));
    assert_eq!(b.lower_bound(&Tagged(4, 0)).get().map(|t| t.1), Some(0));
    assert_eq!(b.upper_bound(&Tagged(2, 0)).get().map(|t| t.1), Some(0));
    let mut c = b.upper_bound(&Tagged(4, 0));
    assert!(c.is_end());
    c.move_prev();
    assert_eq!(c.get().map(|t| t.1), Some(6));
}

#[test]
fn exp_random_against_sorted_vec() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut b = RbMultiSet::new();
    let mut v: Vec<u8> = Vec::new();
    for i in 0..5000 {
        let x: u8 = rng.gen_range(0..50);
        match rng.gen_range(0..4) {
            0 | 1 => {
                b.insert(x);
                let at = v.partition_point(|y| *y <= x);
                v.insert(at, x);
            }
            2 => {
                let had = v.binary_search(&x).map(|at| v.remove(at)).is_ok();
                assert_eq!(b.remove_one(&x), had);
            }
            _ => {
                let before = v.len();
                v.retain(|y| *y != x);
                assert_eq!(b.erase(&x), before - v.len());
            }
        }
        assert_eq!(b.count(&x), v.iter().filter(|y| **y == x).count());
        if i % 100 == 0 {
            assert!(b.as_tree().validate(false).is_ok());
        }
    }
    assert!(b.len() == v.len());
    assert!(b.iter().eq(v.iter()));
    assert!(b.iter().rev().eq(v.iter().rev()));
}

#[test]
fn exp_merge_moves_everything() {
    let mut a = RbMultiSet::from([1, 2, 2]);
    let mut b = RbMultiSet::with_comparator(Reverse);
    b.extend([2, 3, 1]);
    a.merge(&mut b);
    assert!(b.is_empty());
    assert!(a.iter().copied().eq([1, 1, 2, 2, 2, 3]));
    assert!(a.as_tree().validate(false).is_ok());
}

#[test]
fn exp_ends_range_retain() {
    let mut b: RbMultiSet<i32> = [7, 3, 3, 9, 1, 9].into_iter().collect();
    assert_eq!(b.first(), Some(&1));
    assert_eq!(b.last(), Some(&9));
    assert!(b.range(3..=7).copied().eq([3, 3, 7]));
    assert!(b.range(..9).rev().copied().eq([7, 3, 3, 1]));
    assert_eq!(b.pop_first(), Some(1));
    assert_eq!(b.pop_last(), Some(9));
    b.retain(|x| *x != 3);
    assert!(b.iter().copied().eq([7, 9]));
    assert_eq!(b.cursor_front().get(), Some(&7));
    assert_eq!(b.cursor_back().get(), Some(&9));
}

#[test]
fn exp_traits() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let a = RbMultiSet::from([2, 1, 2]);
    let b = a.clone();
    assert!(a == b);
    let h = |s: &RbMultiSet<i32>| {
        let mut st = DefaultHasher::new();
        s.hash(&mut st);
        st.finish()
    };
    assert_eq!(h(&a), h(&b));
    assert!(a != RbMultiSet::from([1, 2]));
    assert_eq!(format!("{:?}", a), "[1, 2, 2]");
    let mut c: RbMultiSet<i32> = RbMultiSet::default();
    c.extend(&a);
    c.extend(a.iter());
    assert!(c.len() == 6);
    let mut d = RbMultiSet::new();
    d.swap(&mut c);
    assert!(c.is_empty() && d.len() == 6);
    d.clear();
    assert!(d.is_empty());
    assert!(a.into_iter().eq([1, 2, 2]));
}

#[test]
fn exp_try_insert() {
    let mut b = RbMultiSet::new();
    assert!(b.try_insert(4).is_ok());
    assert_eq!(b.try_insert(4).map(|c| c.get().copied()), Ok(Some(4)));
    assert_eq!(b.emplace(4).get(), Some(&4));
    assert_eq!(b.count(&4), 3);
}
