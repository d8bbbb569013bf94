use super::*;
use crate::collections::compare::Reverse;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeSet;

#[test]
fn exp_insert_remove() {
    let mut s = RbSet::new();
    assert!(s.insert(3).1);
    assert!(s.insert(1).1);
    let (c, inserted) = s.insert(3);
    assert!(!inserted);
    assert_eq!(c.get(), Some(&3));
    assert!(!s.emplace(1).1);
    assert!(s.emplace(2).1);
    assert!(s.len() == 3);
    assert!(s.contains(&2));
    assert_eq!(s.get(&2), Some(&2));
    assert!(s.remove(&2));
    assert!(!s.remove(&2));
    assert_eq!(s.erase(&3), 1);
    assert_eq!(s.erase(&3), 0);
    assert_eq!(s.take(&1), Some(1));
    assert!(s.is_empty());
    assert!(s.find(&1) == s.cursor_end());
}

#[test]
fn exp_first_last_pop() {
    let mut s: RbSet<i32> = [5, 1, 9, 3].into_iter().collect();
    assert_eq!(s.first(), Some(&1));
    assert_eq!(s.last(), Some(&9));
    assert_eq!(s.pop_first(), Some(1));
    assert_eq!(s.pop_last(), Some(9));
    assert!(s.iter().copied().eq([3, 5]));
    s.clear();
    assert_eq!(s.first(), None);
    assert_eq!(s.pop_last(), None);
}

#[test]
fn exp_merge_retain() {
    let mut a = RbSet::from([1, 2, 3]);
    let mut b = RbSet::from([3, 4, 5]);
    a.merge(&mut b);
    assert!(a.iter().copied().eq(1..=5));
    assert!(b.iter().copied().eq([3]));
    a.retain(|x| x % 2 == 1);
    assert!(a.iter().copied().eq([1, 3, 5]));
    assert!(a.as_tree().validate(true).is_ok());
}

#[test]
fn exp_subset_superset_disjoint() {
    let sup = RbSet::from([1, 2, 3]);
    let mut set = RbSet::new();
    assert!(set.is_subset(&sup));
    set.insert(2);
    assert!(set.is_subset(&sup));
    assert!(sup.is_superset(&set));
    set.insert(4);
    assert!(!set.is_subset(&sup));
    assert!(!sup.is_superset(&set));
    assert!(!set.is_disjoint(&sup));
    let other = RbSet::from([7, 8]);
    assert!(other.is_disjoint(&sup));
    assert!(sup.is_disjoint(&other));
}

#[test]
fn exp_range_bounds_cursor() {
    let s: RbSet<i32> = (0..50).map(|x| x * 2).collect();
    assert!(s.range(10..=14).copied().eq([10, 12, 14]));
    assert!(s.range(91..).copied().eq([92, 94, 96, 98]));
    assert!(s.range(3..7).rev().copied().eq([6, 4]));
    assert_eq!(format!("{:?}", s.range(0..5)), "[0, 2, 4]");
    assert_eq!(s.lower_bound(&9).get(), Some(&10));
    assert_eq!(s.upper_bound(&10).get(), Some(&12));
    let mut c = s.cursor_front();
    assert_eq!(c.peek_prev(), None);
    c.move_prev();
    assert!(c.is_end());
    assert_eq!(c.peek_next(), Some(&0));
    assert_eq!(c.peek_prev(), Some(&98));
    c.move_prev();
    assert!(c == s.cursor_back());
    assert_eq!(format!("{:?}", c), "Cursor(Some(98))");
}

#[test]
fn exp_reverse_comparator() {
    let mut s = RbSet::with_comparator(Reverse);
    s.extend([3, 1, 4, 1, 5, 9, 2, 6]);
    assert!(s.iter().copied().eq([9, 6, 5, 4, 3, 2, 1]));
    assert!(s.range(6..=2).copied().eq([6, 5, 4, 3, 2]));
    assert!(s.as_tree().validate(true).is_ok());
    let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
    let mut t = RbSet::with_comparator(by_len);
    t.insert("aa");
    t.insert("b");
    assert!(!t.insert("zz").1);
    assert!(t.iter().copied().eq(["b", "aa"]));
}

#[test]
fn exp_traits() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let a = RbSet::from([1, 2, 3]);
    let b = a.clone();
    assert!(a == b);
    let h = |s: &RbSet<i32>| {
        let mut st = DefaultHasher::new();
        s.hash(&mut st);
        st.finish()
    };
    assert_eq!(h(&a), h(&b));
    assert_eq!(format!("{:?}", a), "{1, 2, 3}");
    let mut c: RbSet<i32> = RbSet::default();
    c.extend(a.iter());
    assert!(c == a);
    let mut n = 0;
    for x in &a {
        n += x;
    }
    assert_eq!(n, 6);
    let mut it = a.into_iter();
    assert_eq!(it.len(), 3);
    assert_eq!(it.next_back(), Some(3));
    assert_eq!(it.next(), Some(1));
    assert!(it.eq([2]));
    let mut x = RbSet::from([1]);
    let mut y = RbSet::from([2, 3]);
    x.swap(&mut y);
    assert!(x.len() == 2 && y.len() == 1);
}

#[test]
fn exp_random_against_std() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut s = RbSet::new();
    let mut t = BTreeSet::new();
    for i in 0..10000 {
        let v: u32 = rng.gen_range(0..400);
        if rng.gen_bool(0.5) {
            assert_eq!(s.insert(v).1, t.insert(v));
        } else {
            assert_eq!(s.remove(&v), t.remove(&v));
        }
        if i % 100 == 0 {
            assert!(s.as_tree().validate(true).is_ok());
        }
    }
    assert!(s.iter().eq(t.iter()));
    assert!(s.iter().rev().eq(t.iter().rev()));
    assert_eq!(s.iter().len(), t.len());
}

#[test]
fn exp_try_insert() {
    let mut s = RbSet::new();
    assert_eq!(s.try_insert(1).map(|(c, i)| (c.get().copied(), i)), Ok((Some(1), true)));
    assert_eq!(s.try_insert(1).map(|(_, i)| i), Ok(false));
}
