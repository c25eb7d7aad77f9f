//! Basic record store: get, set, subscribe, unsubscribe

use storekit::{create_store, Primitives, RecordStore, Subscriber};

fn main() {
    println!("=== Record Store Example ===\n");

    let factory = create_store(|p: Primitives<i32>| {
        move |initial: i32| {
            p.set.set(initial);
            RecordStore::new(&p)
        }
    });

    let count = factory.build(0);
    let other = factory.build(100);

    // Subscribing fires once with the current value
    let logger = Subscriber::new(|args: &[i32]| println!("Count changed to: {:?}", args));
    let unsubscribe = count.subscribe(&logger).expect("fresh subscriber");

    // Subscribing the same subscriber again does nothing
    assert!(count.subscribe(&logger).is_none());

    count.set(5);
    count.update(|n| n.copied().unwrap_or(0) + 1);

    // Every argument reaches subscribers; the first one is stored
    count.set_args(vec![10, 20, 30]);
    println!("Stored value: {:?}", count.get());

    unsubscribe.unsubscribe();
    count.set(11);
    println!("After unsubscribe, value is {:?} (no log line above)", count.get());

    // Instances never share state
    println!("Other store still holds: {:?}", other.get());
}
