use std::cell::RefCell;
use std::rc::Rc;

use datastore::prelude::*;
use datastore::HashSet;

#[derive(Clone, Debug, PartialEq)]
struct Sample {
    key: String,
    value: i32,
}
impl_entry!(Sample, key, [value]);

fn sample(key: &str, value: i32) -> Sample {
    Sample {
        key: key.to_string(),
        value,
    }
}

#[test]
fn upsert_keeps_one_value_per_key() {
    let mut store = DataStore::new();
    store.add(sample("k", 1));
    let count_after_first = store.count::<Sample>();
    store.add(sample("k", 2));

    assert_eq!(store.count::<Sample>(), count_after_first);
    assert_eq!(store.get::<Sample>("k"), Some(&sample("k", 2)));
}

#[test]
fn is_new_matches_prior_presence() {
    let mut store = DataStore::new();
    let reports = Rc::new(RefCell::new(Vec::new()));
    let reports_clone = Rc::clone(&reports);
    store
        .typed::<Sample>()
        .subscribe_to_updates(move |_store, sample, is_new| {
            reports_clone.borrow_mut().push((sample.key.clone(), is_new));
        });

    let mut expected = Vec::new();
    for (key, value) in [("a", 1), ("b", 2), ("a", 3), ("c", 4), ("b", 5)] {
        expected.push((key.to_string(), !store.contains::<Sample>(key)));
        store.add(sample(key, value));
    }
    store.remove::<Sample>("a");
    expected.push(("a".to_string(), true));
    store.add(sample("a", 6));

    assert_eq!(*reports.borrow(), expected);
}

#[test]
fn delete_observer_sees_value_still_present() {
    let mut store = DataStore::new();
    let observed = Rc::new(RefCell::new(Vec::new()));
    let observed_clone = Rc::clone(&observed);
    store
        .typed::<Sample>()
        .subscribe_to_deletes(move |store, sample| {
            observed_clone.borrow_mut().push((
                store.contains::<Sample>(&sample.key),
                store.count::<Sample>(),
            ));
        });

    store.add_all(vec![sample("a", 1), sample("b", 2)]);
    assert!(store.remove::<Sample>("a"));
    assert!(store.remove_all::<Sample>());

    assert_eq!(*observed.borrow(), vec![(true, 2), (true, 1)]);
    assert!(!store.contains::<Sample>("a"));
}

#[test]
fn erased_delete_observer_sees_value_still_present() {
    let mut store = DataStore::new();
    let observed = Rc::new(RefCell::new(None));
    let observed_clone = Rc::clone(&observed);
    store.delete_listener::<Sample>(move |store, entry| {
        *observed_clone.borrow_mut() = Some(store.contains::<Sample>(entry.key()));
    });

    store.add(sample("a", 1));
    store.remove_value(&sample("a", 1));
    assert_eq!(*observed.borrow(), Some(true));
}

#[test]
fn random_keys_are_unique() {
    let mut store = DataStore::new();
    store.init_random(1234);
    let mut keys = HashSet::default();
    for i in 0..500 {
        let key = store.random_key::<Sample>();
        assert!(!store.contains::<Sample>(&key));
        keys.insert(key.clone());
        store.add(Sample { key, value: i });
    }
    assert_eq!(keys.len(), 500);
    assert_eq!(store.count::<Sample>(), 500);
}

#[test]
fn remove_all_resets_but_facade_stays_usable() {
    let mut store = DataStore::new();
    let calls = Rc::new(RefCell::new(0));

    let mut samples = store.typed::<Sample>();
    let c = Rc::clone(&calls);
    samples.subscribe_to_updates(move |_store, _sample, _| *c.borrow_mut() += 1);
    let c = Rc::clone(&calls);
    samples.subscribe_to_deletes(move |_store, _sample| *c.borrow_mut() += 100);

    samples.add(sample("a", 1));
    assert_eq!(*calls.borrow(), 1);
    assert!(samples.remove_all());
    assert_eq!(*calls.borrow(), 101);

    assert_eq!(samples.count(), 0);
    samples.add(sample("a", 1));
    assert_eq!(samples.get("a"), Some(&sample("a", 1)));
    samples.remove("a");
    assert_eq!(*calls.borrow(), 101);
}

#[test]
fn global_clear_resets_but_facade_stays_usable() {
    let mut store = DataStore::new();
    let calls = Rc::new(RefCell::new(0));

    let c = Rc::clone(&calls);
    store
        .typed::<Sample>()
        .subscribe_to_updates(move |_store, _sample, _| *c.borrow_mut() += 1);
    let c = Rc::clone(&calls);
    store.add_listener::<Sample>(move |_store, _entry, _| *c.borrow_mut() += 1);
    let c = Rc::clone(&calls);
    store.delete_listener::<Sample>(move |_store, _entry| *c.borrow_mut() += 1);

    store.add(sample("a", 1));
    assert_eq!(*calls.borrow(), 2);
    store.clear();

    assert_eq!(store.count::<Sample>(), 0);
    store.add(sample("a", 1));
    store.remove::<Sample>("a");
    store.add(sample("b", 2));
    assert_eq!(*calls.borrow(), 2);
    assert_eq!(store.get::<Sample>("b"), Some(&sample("b", 2)));
}

#[test]
fn sample_scenario() {
    let mut store = DataStore::new();
    let deleted = Rc::new(RefCell::new(Vec::new()));
    let deleted_clone = Rc::clone(&deleted);
    let added = Rc::new(RefCell::new(0));
    let added_clone = Rc::clone(&added);

    store.add_listener::<Sample>(move |_store, _entry, _| *added_clone.borrow_mut() += 1);
    store
        .typed::<Sample>()
        .subscribe_to_deletes(move |_store, sample| {
            deleted_clone.borrow_mut().push(sample.clone());
        });

    store.add_all(vec![sample("a", 1), sample("b", 2), sample("c", 3)]);
    assert_eq!(store.count::<Sample>(), 3);
    assert_eq!(*added.borrow(), 3);

    if let Some(a) = store.get_mut::<Sample>("a") {
        a.value = 100;
    }
    assert_eq!(store.get::<Sample>("a").map(|a| a.value), Some(100));
    assert_eq!(*added.borrow(), 3);

    assert!(store.remove::<Sample>("a"));
    assert_eq!(*deleted.borrow(), vec![sample("a", 100)]);
    assert!(!store.contains::<Sample>("a"));
    assert_eq!(store.count::<Sample>(), 2);
}

#[test]
fn update_observers_fire_before_per_key_observers() {
    let mut store = DataStore::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    let mut samples = store.typed::<Sample>();
    let o = Rc::clone(&order);
    samples.add_update_listener("x", move |_store, _sample: &Sample| {
        o.borrow_mut().push("key");
    });
    let o = Rc::clone(&order);
    samples.subscribe_to_updates(move |_store, _sample, _| o.borrow_mut().push("all"));

    samples.add(sample("x", 1));
    assert_eq!(*order.borrow(), vec!["all", "key"]);
}

#[test]
fn inspection_lists_types_and_entries() {
    #[derive(Clone)]
    struct Party {
        key: String,
        members: Vec<String>,
        leader: Option<String>,
    }

    impl Entry for Party {
        fn key(&self) -> &str {
            &self.key
        }

        fn describe(&self) -> Vec<Field> {
            vec![
                Field::sequence("members", &self.members),
                Field::optional("leader", self.leader.as_ref()),
            ]
        }
    }

    let mut store = DataStore::new();
    store.add(sample("a", 1));
    store.add(Party {
        key: "p1".to_string(),
        members: vec!["ann".to_string(), "bo".to_string()],
        leader: None,
    });

    assert_eq!(store.registered_type_names(), vec!["Sample", "Party"]);
    let tree = store.describe_type("Party").unwrap();
    assert_eq!(
        tree.render(),
        "root\n  p1\n    members: [2]\n      [0]: ann\n      [1]: bo\n    leader: NULL\n"
    );
}

#[test]
fn remove_all_drains_a_large_table() {
    const ENTRIES: i32 = 100_000;
    let mut store = DataStore::new();
    store.add_all((0..ENTRIES).map(|i| sample(&format!("key-{i}"), i)));

    let deleted = Rc::new(RefCell::new(Vec::new()));
    let deleted_clone = Rc::clone(&deleted);
    store
        .typed::<Sample>()
        .subscribe_to_deletes(move |_store, sample| deleted_clone.borrow_mut().push(sample.value));

    assert!(store.remove_all::<Sample>());
    assert_eq!(store.count::<Sample>(), 0);
    assert_eq!(*deleted.borrow(), (0..ENTRIES).collect::<Vec<_>>());
}
