use super::*;
use crate::collections::compare::Reverse;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    alloc::Layout,
    cell::Cell,
    collections::{hash_map::DefaultHasher, BTreeMap},
    ops::Bound,
    ptr::NonNull,
    rc::Rc,
};

const N: usize = if cfg!(miri) { 100 } else { 10000 };

#[test]
fn exp_at_and_erase() {
    let mut m = RbMap::new();
    m.insert(1, "one");
    m.insert(2, "two");
    m.insert(3, "three");
    assert_eq!(m.at(&2), Ok(&"two"));
    assert_eq!(m.erase(&2), 1);
    assert!(m.len() == 2);
    assert!(m.find(&2) == m.cursor_end());
    assert_eq!(m.at(&2), Err(KeyNotFoundError));
    assert_eq!(m.erase(&2), 0);
    assert!(m.as_tree().validate(true).is_ok());
}

#[test]
fn exp_at_error_is_matchable() {
    let mut m: RbMap<String, i32> = RbMap::new();
    m.insert("a".to_string(), 1);
    let r: Result<i32, Box<dyn Error>> = m.at("b").map(|v| *v).map_err(|e| e.into());
    let e = r.unwrap_err();
    assert!(e.downcast_ref::<KeyNotFoundError>().is_some());
    assert_eq!(e.to_string(), "key not found in map");
    *m.at_mut("a").unwrap() += 1;
    assert_eq!(m["a"], 2);
    assert!(m.at_mut("z").is_err());
}

#[test]
#[should_panic]
fn exp_index_missing_panics() {
    let m: RbMap<i32, i32> = RbMap::new();
    let _ = m[&1];
}

#[test]
fn exp_insert_never_overwrites() {
    let mut m = RbMap::new();
    assert!(m.insert(7, 'a').1);
    let (c, inserted) = m.insert(7, 'b');
    assert!(!inserted);
    assert_eq!(c.key_value(), Some((&7, &'a')));
    assert!(!m.emplace(7, 'c').1);
    assert_eq!(m.get(&7), Some(&'a'));
    assert_eq!(m.insert_or_assign(7, 'd'), Some('a'));
    assert_eq!(m.insert_or_assign(8, 'e'), None);
    assert_eq!(m[&7], 'd');
    assert!(m.len() == 2);
}

#[test]
fn exp_get_or_default() {
    let mut m: RbMap<&str, usize> = RbMap::new();
    for w in "the cat and the hat and the bat".split(' ') {
        *m.get_or_default(w) += 1;
    }
    assert_eq!(m["the"], 3);
    assert_eq!(m["and"], 2);
    assert_eq!(*m.get_or_default("dog"), 0);
    assert!(m.len() == 6);
    assert!(m.keys().copied().eq(["and", "bat", "cat", "dog", "hat", "the"]));
}

#[test]
fn exp_entry() {
    let mut m = RbMap::new();
    *m.entry(1).or_insert(10) += 1;
    m.entry(1).and_modify(|v| *v *= 2).or_insert(0);
    m.entry(2).and_modify(|v| *v *= 2).or_insert(5);
    m.entry(3).or_insert_with(|| 30);
    m.entry(4).or_insert_with_key(|k| k * 100);
    assert_eq!(m.entry(9).key(), &9);
    assert!(m.iter().map(|(k, v)| (*k, *v)).eq([(1, 22), (2, 5), (3, 30), (4, 400)]));
    match m.entry(2) {
        Entry::Occupied(mut e) => {
            assert_eq!(e.key(), &2);
            assert_eq!(e.insert(6), 5);
            assert_eq!(e.get(), &6);
            assert_eq!(e.remove_entry(), (2, 6));
        }
        Entry::Vacant(_) => panic!(),
    }
    match m.entry(2) {
        Entry::Vacant(e) => {
            assert_eq!(format!("{:?}", e), "VacantEntry(2)");
            assert_eq!(e.into_key(), 2);
        }
        Entry::Occupied(_) => panic!(),
    }
    match m.entry(3) {
        Entry::Occupied(e) => {
            assert_eq!(format!("{:?}", e), "OccupiedEntry { key: 3, value: 30 }");
            assert_eq!(e.remove(), 30);
        }
        Entry::Vacant(_) => panic!(),
    }
    assert!(m.len() == 2);
    assert!(m.as_tree().validate(true).is_ok());
}

#[test]
fn exp_entry_random() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut m = RbMap::new();
    let mut s = BTreeMap::new();
    for _ in 0..N {
        let k: u16 = rng.gen_range(0..1000);
        match rng.gen_range(0..3) {
            0 => {
                *m.entry(k).or_insert(0) += 1;
                *s.entry(k).or_insert(0) += 1;
            }
            1 => {
                if let Entry::Occupied(e) = m.entry(k) {
                    e.remove();
                }
                s.remove(&k);
            }
            _ => {
                m.entry(k).and_modify(|v| *v += 10);
                s.entry(k).and_modify(|v| *v += 10);
            }
        }
        assert!(m.len() == s.len());
    }
    assert!(m.as_tree().validate(true).is_ok());
    assert!(m.iter().eq(s.iter()));
}

#[test]
fn exp_merge() {
    let mut a = RbMap::from([(1, "a1"), (3, "a3"), (5, "a5")]);
    let mut b = RbMap::with_comparator(Reverse);
    for (k, v) in [(2, "b2"), (3, "b3"), (4, "b4"), (5, "b5")] {
        b.insert(k, v);
    }
    a.merge(&mut b);
    assert!(a
        .iter()
        .map(|(k, v)| (*k, *v))
        .eq([(1, "a1"), (2, "b2"), (3, "a3"), (4, "b4"), (5, "a5")]));
    assert!(b.iter().map(|(k, v)| (*k, *v)).eq([(5, "b5"), (3, "b3")]));
    assert!(a.as_tree().validate(true).is_ok());
    assert!(b.as_tree().validate(true).is_ok());
}

#[test]
fn exp_retain_and_pop() {
    let mut m: RbMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
    m.retain(|k, v| {
        *v *= 2;
        k % 10 == 0
    });
    assert!(m.len() == 10);
    assert_eq!(m.first_key_value(), Some((&0, &0)));
    assert_eq!(m.last_key_value(), Some((&90, &180)));
    assert_eq!(m.pop_first(), Some((0, 0)));
    assert_eq!(m.pop_last(), Some((90, 180)));
    assert_eq!(m.remove(&50), Some(100));
    assert_eq!(m.remove_entry(&60), Some((60, 120)));
    assert_eq!(m.remove(&50), None);
    assert!(m.keys().copied().eq([10, 20, 30, 40, 70, 80]));
}

#[test]
fn exp_from_iter_first_wins() {
    let m: RbMap<i32, char> = [(2, 'x'), (1, 'y'), (2, 'z')].into_iter().collect();
    assert!(m.len() == 2);
    assert_eq!(m[&2], 'x');
    let mut n: RbMap<i32, char> = RbMap::new();
    n.extend(m.iter());
    assert!(n == m);
}

#[test]
fn exp_traits() {
    use std::hash::{Hash, Hasher};
    let a = RbMap::from([(1, 2), (3, 4)]);
    let mut b = a.clone();
    assert!(a == b);
    let h = |m: &RbMap<i32, i32>| {
        let mut s = DefaultHasher::new();
        m.hash(&mut s);
        s.finish()
    };
    assert_eq!(h(&a), h(&b));
    *b.get_mut(&1).unwrap() = 5;
    assert!(a != b);
    assert_eq!(a[&1], 2);
    assert_eq!(format!("{:?}", a), "{1: 2, 3: 4}");
    let d: RbMap<i32, i32> = RbMap::default();
    assert!(d.is_empty());
    let mut total = 0;
    for (_, v) in &a {
        total += v;
    }
    assert_eq!(total, 6);
    for (_, v) in &mut b {
        *v += 1;
    }
    assert!(b.values().copied().eq([6, 5]));
    for v in b.values_mut() {
        *v = 0;
    }
    assert!(b.into_iter().eq([(1, 0), (3, 0)]));
}

#[test]
fn exp_bounds_cursors() {
    let m: RbMap<i32, ()> = (0..20).step_by(5).map(|k| (k, ())).collect();
    assert_eq!(m.lower_bound(&6).key(), Some(&10));
    assert_eq!(m.upper_bound(&10).key(), Some(&15));
    assert!(m.upper_bound(&15).is_end());
    assert!(m.range(1..=10).map(|(k, _)| *k).eq([5, 10]));
    let mut c = m.cursor_back();
    c.move_next();
    assert!(c == m.cursor_end());
    c.move_next();
    assert!(c == m.cursor_front());
    let mut m = m;
    let mut c = m.find_mut(&5);
    assert_eq!(c.remove_current(), Some((5, ())));
    assert_eq!(c.key(), Some(&10));
}

#[test]
fn exp_swap_clear() {
    let mut a = RbMap::from([(1, 1)]);
    let mut b = RbMap::from([(2, 2), (3, 3)]);
    a.swap(&mut b);
    assert!(a.len() == 2 && b.len() == 1);
    a.clear();
    assert!(a.is_empty());
    assert!(a.iter().next().is_none());
}

#[derive(Clone)]
struct Budget(Rc<Cell<usize>>);

unsafe impl Allocator for Budget {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        match self.0.get() {
            0 => Err(AllocError),
            n => {
                self.0.set(n - 1);
                Global.allocate(layout)
            }
        }
    }
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        Global.deallocate(ptr, layout)
    }
}

#[test]
fn exp_try_insert_out_of_memory() {
    let mut m = RbMap::new_in(Budget(Rc::new(Cell::new(2))));
    assert!(m.try_insert(1, 1).is_ok());
    assert!(m.try_insert(2, 2).is_ok());
    assert_eq!(m.try_insert(3, 3).err(), Some(AllocError));
    assert!(!m.try_insert(2, 9).unwrap().1);
    match m.entry(3) {
        Entry::Vacant(e) => assert_eq!(e.try_insert(3).err(), Some(AllocError)),
        Entry::Occupied(_) => panic!(),
    }
    assert!(m.len() == 2);
    assert!(m.as_tree().validate(true).is_ok());
    assert_eq!(AllocError.to_string(), "memory allocation failed");
}

#[test]
fn exp_string_keys() {
    let mut m = RbMap::new();
    for w in ["pear", "apple", "fig", "kiwi"] {
        m.insert(w.to_string(), w.len());
    }
    assert_eq!(m.get("fig"), Some(&3));
    assert!(m.contains_key("kiwi"));
    assert_eq!(m.get_key_value("apple"), Some((&"apple".to_string(), &5)));
    assert!(m
        .range::<str, _>((Bound::Included("b"), Bound::Excluded("l")))
        .map(|(k, _)| k.as_str())
        .eq(["fig", "kiwi"]));
}

#[test]
fn std_entry() {
    let mut m = BTreeMap::new();
    *m.entry(1).or_insert(10) += 1;
    assert_eq!(m[&1], 11);
}
